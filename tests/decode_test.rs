mod common;
use common::*;
use zx81::lang::encode;
use zx81::mach::{decode, decode_p81, decode_program};

#[test]
fn test_listing() {
    assert_eq!(decode(&pfile("10 PRINT \"HELLO\"")), "10 PRINT \"HELLO\"\n");
    assert_eq!(decode(&pfile("10 print")), "10 PRINT \n");
    assert_eq!(
        decode(&pfile("20 PRINT 50.7+A-9-.3E-7")),
        "20 PRINT 50.7+A-9-.3E-7\n"
    );
    assert_eq!(
        decode(&pfile("10 FOR N=0 TO 200\n20 NEXT N")),
        "10 FOR N=0 TO 200\n20 NEXT N\n"
    );
}

#[test]
fn test_empty() {
    assert_eq!(decode(&pfile("")), "");
    assert_eq!(decode_program(&[]), "");
}

#[test]
fn test_hidden_number_differs() {
    let bytes = line(&[0xEC, 0x1D, 0x1C, 0x7E, 133, 32, 0, 0, 0]);
    assert_eq!(
        decode_program(&bytes),
        "1 GOTO [29][28][126][133][32][0][0][0][#=20]\n"
    );
    assert_relists(&bytes);
}

#[test]
fn test_header() {
    let text = "#!basic-start=20\n\
                #!dfile-collapsed\n\
                #!dfile:A[PRINT][0]\n\
                #!dfile:\n\
                #!dfile:%B\n\
                #!basic-vars:[1,2,255]\n\
                #!system-vars:FRAMES=12345\n\
                \n\
                10 PRINT \n\
                20 GOTO 10\n";
    assert_eq!(decode(&pfile(text)), text);
}

#[test]
fn test_expanded_rows() {
    assert_eq!(decode(&pfile("#!dfile:HELLO   \n")), "#!dfile:HELLO\n\n");
    assert_eq!(
        decode(&pfile("#!dfile-collapsed\n#!dfile:A \n")),
        "#!dfile-collapsed\n#!dfile:A[0]\n\n"
    );
}

#[test]
fn test_system_vars() {
    let membot: Vec<String> = (1..=30).map(|b| b.to_string()).collect();
    let text = format!(
        "#!system-vars:DF_SZ=200\n#!system-vars:MEMBOT=[{}]\n\n",
        membot.join(",")
    );
    assert_eq!(decode(&pfile(&text)), text);
    assert_eq!(
        decode(&pfile("#!system-vars:16417=7\n")),
        "#!system-vars:16417=7\n\n"
    );
}

#[test]
fn test_p81() {
    let bytes = encode("10 PRINT").unwrap().to_p81("DEMO").unwrap();
    assert_eq!(decode_p81(&bytes), "# Filename: DEMO\n10 PRINT \n");
}

#[test]
fn test_corrupt() {
    assert_eq!(
        decode(&[0; 10]),
        "# Error: 10 bytes is too short for the system variables\n"
    );
    let mut bytes = pfile("10 PRINT");
    bytes[3] = 0xFF;
    bytes[4] = 0xFF;
    assert!(decode(&bytes).starts_with("# Error: D_FILE points outside the file"));
}

#[test]
fn test_vars_end() {
    let mut bytes = pfile("10 PRINT");
    let last = bytes.len() - 1;
    bytes[last] = 0x81;
    assert_eq!(
        decode(&bytes),
        "# Warning: variables end with 129 instead of 128\n\n10 PRINT \n"
    );
}

#[test]
fn test_leftover_bytes() {
    assert_eq!(
        decode_program(&[0, 10, 2, 0, 0xF5, NEWLINE, 1, 2]),
        "10 PRINT \n# Warning: 2 bytes after the last line could not be converted\n"
    );
    assert_eq!(
        decode_program(&[0, 10, 9, 0, 0xF5, NEWLINE]),
        "# Error: line 10 is 9 bytes long but only 2 bytes remain\n"
    );
}

#[test]
fn test_empty_line() {
    assert_eq!(
        decode_program(&[0, 10, 0, 0, 0, 20, 2, 0, 0xF5, NEWLINE]),
        "10 \n# Note: line 10 has no end marker\n20 PRINT \n"
    );
}
