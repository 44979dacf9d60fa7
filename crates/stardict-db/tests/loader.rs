use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use stardict_db::{Definition, DictPaths, LoadMode, StarDict};

const DEFINITIONS: [(&str, &str); 3] = [
    ("տուն", "m1. дом; жилище"),
    ("ջուր", "mвода"),
    ("հաց", "m"),
];

fn write_fixture(dir: &Path, compressed: bool) -> DictPaths {
    let mut idx = Vec::new();
    let mut data = Vec::new();
    for (word, blob) in DEFINITIONS {
        idx.extend_from_slice(word.as_bytes());
        idx.push(0);
        idx.extend_from_slice(&(data.len() as u32).to_be_bytes());
        idx.extend_from_slice(&(blob.len() as u32).to_be_bytes());
        data.extend_from_slice(blob.as_bytes());
    }

    let mut paths = DictPaths::new(dir, "fixture");
    fs::write(
        &paths.ifo,
        "StarDict's dict ifo file\nversion=2.4.2\nwordcount=3\nbookname=Fixture\n",
    )
    .unwrap();
    fs::write(&paths.idx, idx).unwrap();
    if compressed {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).unwrap();
        fs::write(&paths.dict, encoder.finish().unwrap()).unwrap();
    } else {
        paths.dict = dir.join("fixture.dict");
        fs::write(&paths.dict, data).unwrap();
    }
    paths
}

fn texts(dict: &StarDict) -> Vec<(String, Option<String>)> {
    dict.iter_definitions()
        .map(|(entry, def)| {
            let text = match def {
                Definition::Text(t) => Some(t.into_owned()),
                _ => None,
            };
            (entry.word.clone(), text)
        })
        .collect()
}

#[test]
fn reads_gzip_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_fixture(dir.path(), true);
    let dict = StarDict::load(&paths).expect("load fixture");

    assert_eq!(dict.metadata().word_count(), Some(3));
    assert_eq!(dict.entries().len(), 3);
    assert_eq!(
        texts(&dict),
        vec![
            ("տուն".to_string(), Some("1. дом; жилище".to_string())),
            ("ջուր".to_string(), Some("вода".to_string())),
            ("հաց".to_string(), None),
        ]
    );
}

#[test]
fn plain_dictionary_matches_in_both_modes() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_fixture(dir.path(), false);
    let mapped = StarDict::load_with_mode(&paths, LoadMode::Mmap).unwrap();
    let owned = StarDict::load_with_mode(&paths, LoadMode::Owned).unwrap();
    assert_eq!(texts(&mapped), texts(&owned));
    assert_eq!(mapped.data_len(), owned.data_len());
}

#[test]
fn reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DictPaths::new(dir.path(), "absent");
    assert_eq!(paths.missing().len(), 3);
    let err = StarDict::load(&paths).err().expect("missing files rejected");
    assert!(err.to_string().contains("missing required StarDict file"));
}
