//! The five byte floating point format of the ZX81.
//!
//! Byte 0 holds the exponent biased by 129. Bytes 1 to 4 hold the 31 bit
//! mantissa, most significant byte first, with the leading one implied.

use crate::error;
use crate::lang::Error;
use byteorder::{BigEndian, ByteOrder};

pub const SIZE: usize = 5;

const BIAS: i32 = 129;
const MIN_EXPONENT: i32 = -129;
const MAX_EXPONENT: i32 = 126;
const SCALE: f64 = 2147483648.0;

/// Encodes a non-negative number.
pub fn encode(value: f64) -> Result<[u8; SIZE], Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(error!(InvalidNumber; "{} is not a positive number", value));
    }
    let mut bytes = [0u8; SIZE];
    if value == 0.0 {
        return Ok(bytes);
    }
    let mut exponent = value.log2().floor() as i32;
    while 2f64.powi(exponent) > value {
        exponent -= 1;
    }
    while 2f64.powi(exponent + 1) <= value {
        exponent += 1;
    }
    let mut mantissa = ((value / 2f64.powi(exponent) - 1.0) * SCALE + 0.5).floor() as u64;
    if mantissa >= SCALE as u64 {
        mantissa = 0;
        exponent += 1;
    }
    if exponent < MIN_EXPONENT || exponent > MAX_EXPONENT {
        return Err(error!(Overflow; "{} is out of range", value));
    }
    bytes[0] = (exponent + BIAS) as u8;
    BigEndian::write_u32(&mut bytes[1..], mantissa as u32 & 0x7FFF_FFFF);
    Ok(bytes)
}

/// Decodes five bytes. The sign bit is read as part of the mantissa.
pub fn decode(bytes: &[u8; SIZE]) -> f64 {
    if bytes.iter().all(|b| *b == 0) {
        return 0.0;
    }
    let exponent = bytes[0] as i32 - BIAS;
    let mantissa = BigEndian::read_u32(&bytes[1..]) as f64;
    (mantissa / SCALE + 1.0) * 2f64.powi(exponent)
}
