//! FASTQ I/O: paired-read parsing with format validation, and output
//! writing. Transparently reads/writes `.gz` inputs based on extension.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::DedupError;
use crate::model::{Read, ReadPair, R1, R2};
use crate::seqops::strip_newlines;

fn is_gz(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Filename must end in `.fastq` or `.fastq.gz`.
fn has_fastq_extension(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".fastq") || name.ends_with(".fastq.gz")
}

fn check_fastq_extension(path: &Path) -> Result<(), DedupError> {
    if has_fastq_extension(path) {
        Ok(())
    } else {
        Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: 0,
            reason: "non-.fastq(.gz) extension".into(),
        })
    }
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, DedupError> {
    let file = File::open(path).map_err(|source| DedupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let buffered = BufReader::new(file);
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(buffered))))
    } else {
        Ok(Box::new(buffered))
    }
}

fn open_writer(path: &Path) -> Result<Box<dyn Write>, DedupError> {
    let file = File::create(path).map_err(|source| DedupError::OutputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let buffered = BufWriter::new(file);
    if is_gz(path) {
        Ok(Box::new(GzEncoder::new(buffered, Compression::default())))
    } else {
        Ok(Box::new(buffered))
    }
}

/// Read one 4-line FASTQ record (name, seq, plus, qual) from `reader`,
/// validating the `@` name prefix and equal seq/qual length. Returns `Ok(None)`
/// at a clean end of file (no partial record).
fn read_record(
    reader: &mut dyn BufRead,
    path: &Path,
    record_index: usize,
) -> Result<Option<Read>, DedupError> {
    let mut name = String::new();
    let n = reader.read_line(&mut name).map_err(|source| DedupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    if n == 0 {
        return Ok(None);
    }
    strip_newlines(&mut name);
    if !name.starts_with('@') {
        return Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: record_index,
            reason: "record name does not start with '@'".into(),
        });
    }

    let mut seq = String::new();
    if reader.read_line(&mut seq).map_err(|source| DedupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })? == 0
    {
        return Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: record_index,
            reason: "truncated record: missing sequence line".into(),
        });
    }
    strip_newlines(&mut seq);

    let mut plus = String::new();
    if reader.read_line(&mut plus).map_err(|source| DedupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })? == 0
    {
        return Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: record_index,
            reason: "truncated record: missing '+' line".into(),
        });
    }

    let mut qual = String::new();
    if reader.read_line(&mut qual).map_err(|source| DedupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })? == 0
    {
        return Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: record_index,
            reason: "truncated record: missing quality line".into(),
        });
    }
    strip_newlines(&mut qual);

    if qual.len() != seq.len() {
        return Err(DedupError::InputFormat {
            path: path.to_path_buf(),
            record: record_index,
            reason: "sequence and quality differ in length".into(),
        });
    }

    Ok(Some(Read::new(name, seq.into_bytes(), qual.into_bytes())))
}

/// The R1/R2 names must match everywhere except a '1' vs '2' at the same
/// position (e.g. `@frag/1` and `@frag/2`).
fn names_are_paired(name1: &str, name2: &str, path1: &Path, path2: &Path, record: usize) -> Result<(), DedupError> {
    let b1 = name1.as_bytes();
    let b2 = name2.as_bytes();
    let matches = b1.len() == b2.len()
        && b1.iter().zip(b2.iter()).all(|(&c1, &c2)| c1 == c2 || (c1 == b'1' && c2 == b'2'));
    if matches {
        Ok(())
    } else {
        Err(DedupError::InputFormat {
            path: path1.to_path_buf(),
            record,
            reason: format!("read1/read2 names don't match ({path1:?}/{path2:?}): {name1:?} vs {name2:?}"),
        })
    }
}

/// Read both FASTQ files into a vector of `ReadPair`s, validating name
/// pairing and equal record counts. Accepts plain or gzip-compressed input
/// based on the `.gz` extension.
pub fn read_fastqs(read1_path: &Path, read2_path: &Path) -> Result<Vec<ReadPair>, DedupError> {
    check_fastq_extension(read1_path)?;
    check_fastq_extension(read2_path)?;

    let mut r1_reader = open_reader(read1_path)?;
    let mut r2_reader = open_reader(read2_path)?;

    // Pre-reserve space for roughly as many pairs as R1's uncompressed file
    // size implies (4 lines/record, ~2 bytes/base average line length),
    // mirroring the original tool's single upfront allocation sized from
    // `ftell`. Unlike a C malloc this is advisory: an under-estimate just
    // costs a few reallocations, not a failed run.
    let mut pairs = Vec::new();
    if let Ok(metadata) = std::fs::metadata(read1_path) {
        let estimated_records = (metadata.len() / 200).max(1) as usize;
        pairs.try_reserve(estimated_records).map_err(|source| DedupError::OutOfMemory {
            what: "read pair buffer",
            requested: estimated_records,
            source,
        })?;
    }
    let mut record = 0usize;
    loop {
        let r1 = read_record(&mut *r1_reader, read1_path, record)?;
        let r2 = read_record(&mut *r2_reader, read2_path, record)?;

        let (r1_present, r2_present) = (r1.is_some(), r2.is_some());
        match (r1, r2) {
            (None, None) => break,
            (Some(_), None) | (None, Some(_)) => {
                return Err(DedupError::ReadCountMismatch {
                    read1: if r1_present { record + 1 } else { record },
                    read2: if r2_present { record + 1 } else { record },
                });
            }
            (Some(r1), Some(r2)) => {
                names_are_paired(&r1.name, &r2.name, read1_path, read2_path, record)?;
                pairs.push(ReadPair::new(r1, r2));
            }
        }
        record += 1;
    }

    Ok(pairs)
}

fn deduped_path(original: &Path) -> PathBuf {
    let stem = original.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let dir = original.parent().unwrap_or_else(|| Path::new("."));
    let ext = original.extension().and_then(|e| e.to_str()).unwrap_or("fastq");
    if ext == "gz" {
        let inner_stem = Path::new(stem).file_stem().and_then(|s| s.to_str()).unwrap_or(stem);
        dir.join(format!("{inner_stem}.deduped.fastq.gz"))
    } else {
        dir.join(format!("{stem}.deduped.fastq"))
    }
}

/// Write both mates of every surviving pair to `<stem>.deduped.fastq[.gz]`
/// next to each input path.
pub fn write_fastqs(pairs: &[ReadPair], read1_path: &Path, read2_path: &Path) -> Result<(), DedupError> {
    for (idx, original) in [read1_path, read2_path].into_iter().enumerate() {
        let out_path = deduped_path(original);
        let mut writer = open_writer(&out_path)?;
        for pair in pairs {
            let read = if idx == R1 { &pair.reads[R1] } else { &pair.reads[R2] };
            write_record(&mut writer, read).map_err(|source| DedupError::OutputOpen {
                path: out_path.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

fn write_record(writer: &mut dyn Write, read: &Read) -> io::Result<()> {
    writer.write_all(read.name.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.write_all(&read.seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(&read.qual)?;
    writer.write_all(b"\n")
}
