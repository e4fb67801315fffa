use std::fs;
use std::io::{Seek, SeekFrom, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

use fru::field::{self, FieldData, ScalarKind, FIELD_TABLE};
use fru::{AreaKind, FetchMask, FieldValue, NormalFru};

mod cmdline;

use cmdline::{Command, CommandLine};

fn print_field(name: &str, data: &FieldData, num: Option<i32>) {
    let suffix = num.map(|n| format!("[{n}]")).unwrap_or_default();
    match data {
        FieldData::Int(v) => println!("{name}{suffix} = {v}"),
        FieldData::Time(v) => println!("{name}{suffix} = {v} (unix seconds)"),
        FieldData::Text(v) => println!("{name}{suffix} = {v:?}"),
        FieldData::Bytes(v) => println!("{name}{suffix} = {} bytes", v.len()),
    }
}

fn cmd_dump(file: &std::path::Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let fru = NormalFru::decode(&bytes, FetchMask::ALL).context("decoding FRU blob")?;

    for (index, entry) in FIELD_TABLE.iter().enumerate() {
        if entry.array {
            let mut num = 0i32;
            loop {
                match field::get(&fru, index, num) {
                    Ok((name, data, next)) => {
                        print_field(name, &data, Some(num));
                        if next < 0 {
                            break;
                        }
                        num = next;
                    }
                    Err(fru::FruError::NotPresent { .. }) => break,
                    Err(e) => return Err(e.into()),
                }
            }
        } else {
            match field::get(&fru, index, -1) {
                Ok((name, data, _)) => print_field(name, &data, None),
                Err(fru::FruError::NotPresent { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

fn field_index(name: &str) -> Result<usize> {
    FIELD_TABLE
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| anyhow::anyhow!("unknown field {name:?}"))
}

fn apply_assignment(fru: &mut NormalFru, assignment: &str) -> Result<()> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected field.name=value, got {assignment:?}"))?;
    let index = field_index(name)?;
    let entry = FIELD_TABLE[index];

    match entry.kind {
        ScalarKind::Int => {
            let v: u32 = value.parse().with_context(|| format!("parsing {value:?} as an integer"))?;
            field::set_int(fru, index, v)?;
        }
        ScalarKind::Time => {
            let v: i64 = value.parse().with_context(|| format!("parsing {value:?} as a unix timestamp"))?;
            field::set_time(fru, index, v)?;
        }
        ScalarKind::Binary => {
            let bytes = hex_decode(value)?;
            field::set_data(fru, index, -1, Some(FieldValue::Binary(bytes)))?;
        }
        ScalarKind::AsciiString => {
            field::set_data(fru, index, -1, Some(FieldValue::Ascii(value.to_string())))?;
        }
    }
    Ok(())
}

fn hex_decode(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        bail!("hex payload {s:?} has an odd number of digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).with_context(|| format!("invalid hex byte {:?}", &s[i..i + 2])))
        .collect()
}

fn cmd_set(file: &std::path::Path, assignments: &[String]) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let mut fru = NormalFru::decode(&bytes, FetchMask::ALL).context("decoding FRU blob")?;

    for assignment in assignments {
        apply_assignment(&mut fru, assignment)
            .with_context(|| format!("applying assignment {assignment:?}"))?;
    }

    let mut new_blob = bytes.clone();
    let deltas = fru.encode(&mut new_blob).context("encoding FRU blob")?;

    let mut out = fs::OpenOptions::new()
        .write(true)
        .open(file)
        .with_context(|| format!("opening {} for write-back", file.display()))?;
    for (offset, length) in &deltas {
        out.seek(SeekFrom::Start(*offset as u64))?;
        out.write_all(&new_blob[*offset..*offset + *length])?;
    }
    tracing::info!(ranges = deltas.len(), "wrote back delta");
    fru.write_complete();
    Ok(())
}

fn cmd_new(
    file: &std::path::Path,
    capacity: usize,
    chassis: bool,
    board: bool,
    product: bool,
    internal_use: bool,
) -> Result<()> {
    let mut fru = NormalFru::new(capacity);
    let mut offset = 8usize;

    let mut add = |kind: AreaKind, length: usize, offset: &mut usize| -> Result<()> {
        fru.add_area(kind, *offset, length)?;
        *offset += length;
        Ok(())
    };
    if internal_use {
        add(AreaKind::InternalUse, 8, &mut offset)?;
    }
    if chassis {
        add(AreaKind::Chassis, 32, &mut offset)?;
    }
    if board {
        add(AreaKind::Board, 32, &mut offset)?;
    }
    if product {
        add(AreaKind::Product, 64, &mut offset)?;
    }

    let mut blob = vec![0u8; capacity];
    fru.encode(&mut blob).context("encoding fresh FRU blob")?;
    fs::write(file, blob).with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = CommandLine::parse();
    match args.command {
        Command::Dump { file } => cmd_dump(&file),
        Command::Set { file, assignments } => cmd_set(&file, &assignments),
        Command::New { file, capacity, chassis, board, product, internal_use } => {
            cmd_new(&file, capacity, chassis, board, product, internal_use)
        }
    }
}
