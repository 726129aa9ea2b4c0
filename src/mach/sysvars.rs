use crate::error;
use crate::lang::Error;
use byteorder::{ByteOrder, LittleEndian};

/// Address of the first system variable. A P-file is loaded here.
pub const BASE: u16 = 0x4009;

/// Size of the system variable block saved in a P-file.
pub const SIZE: usize = 116;

/// One field of the system variable block.
#[derive(Debug, PartialEq, Eq)]
pub struct SysVar {
    pub name: &'static str,
    pub address: u16,
    pub size: usize,
    /// Pointers recomputed from the region sizes whenever a P-file is built.
    pub structural: bool,
}

impl SysVar {
    pub fn offset(&self) -> usize {
        (self.address - BASE) as usize
    }

    fn range(&self) -> std::ops::Range<usize> {
        self.offset()..self.offset() + self.size
    }
}

macro_rules! sysvar {
    ($name:expr, $address:expr, $size:expr) => {
        SysVar {
            name: $name,
            address: $address,
            size: $size,
            structural: false,
        }
    };
    ($name:expr, $address:expr, $size:expr, structural) => {
        SysVar {
            name: $name,
            address: $address,
            size: $size,
            structural: true,
        }
    };
}

#[rustfmt::skip]
static FIELDS: [SysVar; 33] = [
    sysvar!("VERSN", 16393, 1),
    sysvar!("E_PPC", 16394, 2),
    sysvar!("D_FILE", 16396, 2, structural),
    sysvar!("DF_CC", 16398, 2, structural),
    sysvar!("VARS", 16400, 2, structural),
    sysvar!("DEST", 16402, 2),
    sysvar!("E_LINE", 16404, 2, structural),
    sysvar!("CH_ADD", 16406, 2, structural),
    sysvar!("X_PTR", 16408, 2),
    sysvar!("STKBOT", 16410, 2, structural),
    sysvar!("STKEND", 16412, 2, structural),
    sysvar!("BERG", 16414, 1),
    sysvar!("MEM", 16415, 2),
    sysvar!("16417", 16417, 1),
    sysvar!("DF_SZ", 16418, 1),
    sysvar!("S_TOP", 16419, 2),
    sysvar!("LAST_K", 16421, 2),
    sysvar!("16423", 16423, 1),
    sysvar!("MARGIN", 16424, 1),
    sysvar!("NXTLIN", 16425, 2, structural),
    sysvar!("OLDPPC", 16427, 2),
    sysvar!("FLAGX", 16429, 1),
    sysvar!("STRLEN", 16430, 2),
    sysvar!("T_ADDR", 16432, 2),
    sysvar!("SEED", 16434, 2),
    sysvar!("FRAMES", 16436, 2),
    sysvar!("COORDS", 16438, 2),
    sysvar!("PR_CC", 16440, 1),
    sysvar!("S_POSN", 16441, 2),
    sysvar!("CDFLAG", 16443, 1),
    sysvar!("PRBUFF", 16444, 33),
    sysvar!("MEMBOT", 16477, 30),
    sysvar!("16507", 16507, 2),
];

#[rustfmt::skip]
const DEFAULT: [u8; SIZE] = [
    0x00,                                           // VERSN
    0x01, 0x00,                                     // E_PPC
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // D_FILE DF_CC VARS DEST
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // E_LINE CH_ADD X_PTR STKBOT
    0x00, 0x00,                                     // STKEND
    0x00,                                           // BERG
    0x3D, 0x40,                                     // MEM
    0x00,                                           // 16417
    0x02,                                           // DF_SZ
    0x02, 0x00,                                     // S_TOP
    0xBF, 0xFD,                                     // LAST_K
    0x0F,                                           // 16423
    0x37,                                           // MARGIN
    0x00, 0x00,                                     // NXTLIN
    0x00, 0x00,                                     // OLDPPC
    0x00,                                           // FLAGX
    0x00, 0x00,                                     // STRLEN
    0x8D, 0x0C,                                     // T_ADDR
    0x00, 0x00,                                     // SEED
    0xA3, 0xF5,                                     // FRAMES
    0x00, 0x00,                                     // COORDS
    0xBC,                                           // PR_CC
    0x21, 0x18,                                     // S_POSN
    0x40,                                           // CDFLAG
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // PRBUFF
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x76,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // MEMBOT
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,                                     // 16507
];

/// All fields in address order.
pub fn fields() -> &'static [SysVar] {
    &FIELDS
}

/// Finds a field by name, ignoring case, or by its decimal address.
pub fn lookup(key: &str) -> Option<&'static SysVar> {
    let key = key.trim();
    if let Ok(address) = key.parse::<u16>() {
        return FIELDS.iter().find(|v| v.address == address);
    }
    FIELDS.iter().find(|v| v.name.eq_ignore_ascii_case(key))
}

/// A field value. One and two byte fields are numbers, wider ones bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(u16),
    Bytes(Vec<u8>),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Value::*;
        match self {
            Number(n) => write!(f, "{}", n),
            Bytes(v) => {
                let list: Vec<String> = v.iter().map(|b| b.to_string()).collect();
                write!(f, "[{}]", list.join(","))
            }
        }
    }
}

/// The 116 byte system variable block of a P-file.
#[derive(Clone, PartialEq)]
pub struct SystemVariables {
    bytes: [u8; SIZE],
}

impl Default for SystemVariables {
    /// The block as left by a freshly reset machine.
    fn default() -> Self {
        SystemVariables { bytes: DEFAULT }
    }
}

impl std::fmt::Debug for SystemVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SystemVariables {:?}", &self.bytes[..])
    }
}

impl SystemVariables {
    pub fn from_bytes(bytes: &[u8]) -> Result<SystemVariables, Error> {
        if bytes.len() < SIZE {
            return Err(error!(InvalidPFile; "{} bytes is too short for the system variables", bytes.len()));
        }
        let mut sv = SystemVariables::default();
        sv.bytes.copy_from_slice(&bytes[..SIZE]);
        Ok(sv)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get(&self, key: &str) -> Result<Value, Error> {
        Ok(self.value(find(key)?))
    }

    pub fn value(&self, var: &SysVar) -> Value {
        let bytes = &self.bytes[var.range()];
        match var.size {
            1 => Value::Number(bytes[0] as u16),
            2 => Value::Number(LittleEndian::read_u16(bytes)),
            _ => Value::Bytes(bytes.to_vec()),
        }
    }

    /// Reads a pointer field.
    pub fn word(&self, var: &SysVar) -> u16 {
        LittleEndian::read_u16(&self.bytes[var.offset()..])
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<(), Error> {
        let var = find(key)?;
        self.set_value(var, value)
    }

    pub fn set_value(&mut self, var: &SysVar, value: Value) -> Result<(), Error> {
        let bytes = match value {
            Value::Number(n) if var.size == 1 => {
                if n > 0xFF {
                    return Err(error!(SystemVariable; "{} is a single byte, {} is too large", var.name, n));
                }
                vec![n as u8]
            }
            Value::Number(n) if var.size == 2 => n.to_le_bytes().to_vec(),
            Value::Number(_) => {
                return Err(error!(SystemVariable; "{} needs a list of {} bytes", var.name, var.size));
            }
            Value::Bytes(v) => v,
        };
        if bytes.len() != var.size {
            return Err(error!(SystemVariable;
                "{} needs {} bytes, got {}", var.name, var.size, bytes.len()));
        }
        self.bytes[var.range()].copy_from_slice(&bytes);
        Ok(())
    }

    pub(crate) fn set_word(&mut self, name: &str, word: u16) {
        if let Some(var) = lookup(name) {
            LittleEndian::write_u16(&mut self.bytes[var.offset()..], word);
        }
    }

    /// Lists the non-structural fields whose bytes differ in `other`,
    /// with the bytes found in `other`.
    pub fn compare(&self, other: &[u8]) -> Vec<(&'static SysVar, Vec<u8>)> {
        FIELDS
            .iter()
            .filter(|var| !var.structural)
            .filter_map(|var| {
                let theirs = other.get(var.range()).unwrap_or(&[]);
                if theirs == &self.bytes[var.range()] {
                    None
                } else {
                    Some((var, theirs.to_vec()))
                }
            })
            .collect()
    }
}

fn find(key: &str) -> Result<&'static SysVar, Error> {
    lookup(key).ok_or_else(|| error!(SystemVariable; "unknown system variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut offset = 0;
        for var in fields() {
            assert_eq!(var.offset(), offset, "{}", var.name);
            offset += var.size;
        }
        assert_eq!(offset, SIZE);
    }

    #[test]
    fn test_defaults() {
        let sv = SystemVariables::default();
        assert_eq!(sv.get("VERSN").unwrap(), Value::Number(0));
        assert_eq!(sv.get("PR_CC").unwrap(), Value::Number(0xBC));
        assert_eq!(sv.get("FRAMES").unwrap(), Value::Number(0xF5A3));
        assert_eq!(sv.as_bytes()[47], 0xBC);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("d_file").unwrap().address, 16396);
        assert_eq!(lookup("16396").unwrap().name, "D_FILE");
        assert_eq!(lookup("16417").unwrap().size, 1);
        assert!(lookup("16397").is_none());
        assert!(lookup("16392").is_none());
        assert!(lookup("unknown").is_none());
    }

    #[test]
    fn test_set() {
        let mut sv = SystemVariables::default();
        sv.set("16396", Value::Number(0x1234)).unwrap();
        assert_eq!(&sv.as_bytes()[3..5], &[0x34, 0x12]);
        assert!(sv.set("VERSN", Value::Number(256)).is_err());
        assert!(sv.set("MEMBOT", Value::Bytes(vec![1, 2, 3, 4])).is_err());
        assert!(sv.set("MEMBOT", Value::Number(1)).is_err());
        assert!(sv.set("unknown", Value::Number(0)).is_err());
        let membot: Vec<u8> = (1..=30).collect();
        sv.set("MEMBOT", Value::Bytes(membot.clone())).unwrap();
        assert_eq!(sv.get("MEMBOT").unwrap(), Value::Bytes(membot));
    }

    #[test]
    fn test_compare() {
        let defaults = SystemVariables::default();
        let mut sv = defaults.clone();
        sv.set_word("D_FILE", 0x4100);
        sv.set_word("VARS", 0x4400);
        sv.set_word("NXTLIN", 0x4090);
        assert!(defaults.compare(sv.as_bytes()).is_empty());

        sv.set("FRAMES", Value::Number(12345)).unwrap();
        sv.set("DF_SZ", Value::Number(200)).unwrap();
        let changed: Vec<&str> = defaults
            .compare(sv.as_bytes())
            .iter()
            .map(|(var, _)| var.name)
            .collect();
        assert_eq!(changed, vec!["DF_SZ", "FRAMES"]);
        assert_eq!(defaults.compare(sv.as_bytes())[1].1, vec![0x39, 0x30]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(200).to_string(), "200");
        assert_eq!(Value::Bytes(vec![1, 2, 255]).to_string(), "[1,2,255]");
    }
}
