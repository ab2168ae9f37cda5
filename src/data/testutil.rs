//! On-disk fixtures for unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::dataset::{RECORDINGS_DIR, TABLE_FILE};
use super::table::COLUMNS;

pub const ROW_13918: &str = "13918,AV+MV,Child,Female,98.0,15.9,False,Present,AV+MV,AV,\
Holosystolic,Plateau,I/VI,Low,Harsh,nan,nan,nan,nan,nan,Abnormal,CC2015,nan";

pub const ROW_2530: &str = "2530,AV+PV+TV+MV,Adolescent,Female,,nan,True,Absent,nan,nan,\
nan,nan,nan,nan,nan,nan,nan,nan,nan,nan,Normal,CC2014,50001";

pub const ANNOTATION_13918: &str = "13918 3 4000\n\
13918_AV.hea 13918_AV.wav 13918_AV.tsv\n\
#Age: Child\n\
#Sex: Female\n\
#Murmur: Present\n";

pub const SAMPLES: [i16; 6] = [0, 812, -1530, 2047, -96, 4];

pub fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

pub fn write_table(path: &Path, rows: &[&str]) {
    let mut text = COLUMNS.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

/// A small dataset root:
///
/// * `13918` – annotation, `AV` with header and segmentation, `MV_1`, `MV_2`
/// * `2530`  – annotation, `PV`
/// * `50000` – annotation, `AV`, but no metadata row
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join(RECORDINGS_DIR);
        fs::create_dir(&data).unwrap();

        fs::write(data.join("13918.txt"), ANNOTATION_13918).unwrap();
        write_wav(&data.join("13918_AV.wav"), 4000, &SAMPLES);
        fs::write(
            data.join("13918_AV.hea"),
            "13918_AV 1 4000 6\n13918_AV.wav 16+44 1 16 0 0 0 0 AV\n",
        )
        .unwrap();
        fs::write(data.join("13918_AV.tsv"), "0\t0.0005\t1\n0.0005\t0.0015\t2\n").unwrap();
        write_wav(&data.join("13918_MV_1.wav"), 2000, &[1, 2, 3]);
        write_wav(&data.join("13918_MV_2.wav"), 2000, &[4, 5]);

        fs::write(data.join("2530.txt"), "2530 1 4000\n").unwrap();
        write_wav(&data.join("2530_PV.wav"), 4000, &[10, 20]);

        fs::write(data.join("50000.txt"), "50000 1 4000\n").unwrap();
        write_wav(&data.join("50000_AV.wav"), 4000, &[7]);

        write_table(&dir.path().join(TABLE_FILE), &[ROW_13918, ROW_2530]);

        Fixture { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.dir.path().join(RECORDINGS_DIR)
    }

    pub fn table_path(&self) -> PathBuf {
        self.dir.path().join(TABLE_FILE)
    }
}
