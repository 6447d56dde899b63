use std::{
    fs::File,
    io::{BufReader, Read, Result},
    path::Path,
};

/// Asserts two files are byte-identical; used by the CLI round-trip mode.
pub fn cmp(file1: &Path, file2: &Path) -> Result<()> {
    let f1 = File::open(file1)?;
    let f2 = File::open(file2)?;

    let l1 = f1.metadata()?.len();
    let l2 = f2.metadata()?.len();

    let r1 = BufReader::new(f1);
    let r2 = BufReader::new(f2);

    let bytes1 = r1.bytes().map(|b| b.unwrap());
    let bytes2 = r2.bytes().map(|b| b.unwrap());
    for (pos, (b1, b2)) in bytes1.zip(bytes2).enumerate() {
        assert_eq!(b1, b2, "Files differ at byte {}", pos);
    }

    assert_eq!(l1, l2, "File 1 is {} bytes and file 2 is {} bytes", l1, l2);
    println!("Compare: OK");
    Ok(())
}
