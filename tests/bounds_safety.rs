//! Truncating any suffix of a valid buffer causes `init` or the first
//! touching accessor to report malformed.

use dato::reader::{Reader, ReaderOptions};
use dato::writer::{EntryRef, Writer, WriterOptions};

fn build_graph() -> Vec<u8> {
    let mut writer = Writer::new_default(WriterOptions::default());
    let key = writer.write_string_key(b"values").unwrap();
    let a = writer.write_u32(1);
    let b = writer.write_u32(2);
    let c = writer.write_u32(3);
    let array = writer.write_array(&[a, b, c]).unwrap();
    let mut entries = vec![EntryRef::for_string_key(key, array)];
    let root = writer.write_string_map(&mut entries).unwrap();
    writer.set_root(root);
    writer.get_data().to_vec()
}

#[test]
fn every_suffix_truncation_is_reported_as_malformed() {
    let full = build_graph();
    assert!(Reader::init_default(&full, ReaderOptions::default()).is_ok());

    for len in 0..full.len() {
        let truncated = &full[..len];
        match Reader::init_default(truncated, ReaderOptions::default()) {
            Err(_) => continue,
            Ok(reader) => {
                // Init succeeded on a short buffer only if it never touches
                // the truncated tail; walking the full value graph must
                // then surface the truncation.
                let root = reader.get_root();
                let result = (|| -> Result<(), dato::Error> {
                    let map = root.as_string_map()?;
                    for i in 0..map.len() {
                        map.key_string(i)?;
                        let array = map.value_at(i)?.as_array()?;
                        for j in 0..array.len() {
                            array.get(j)?.as_u32()?;
                        }
                    }
                    Ok(())
                })();
                assert!(result.is_err(), "truncation to {} bytes was not detected", len);
            }
        }
    }
}

#[test]
fn truncated_header_is_rejected_outright() {
    let full = build_graph();
    for len in 0..7 {
        let truncated = &full[..len];
        assert!(Reader::init_default(truncated, ReaderOptions::default()).is_err());
    }
}
