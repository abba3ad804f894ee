use hublink_client::UploadPlan;
use serde::Serialize;
use tracing::debug;

use crate::cmd::{read_file, PlanArgs};
use crate::exit::{client_error, CliResult};
use crate::output::{crc_string, print_rows, OutputFormat};

#[derive(Serialize)]
struct ChunkOutput {
    index: usize,
    offset: usize,
    len: usize,
    running_crc: String,
}

#[derive(Serialize)]
struct PlanOutput {
    file: String,
    size: usize,
    chunk_size: usize,
    crc: String,
    increment: f64,
    chunks: Vec<ChunkOutput>,
}

pub fn run(args: PlanArgs, format: OutputFormat) -> CliResult<()> {
    let data = read_file(&args.path)?;
    let plan = UploadPlan::new(&data, usize::from(args.chunk_size))
        .map_err(|err| client_error("planning failed", err))?;
    debug!(chunks = plan.chunks().len(), "planned upload");

    let chunks: Vec<ChunkOutput> = plan
        .chunks()
        .iter()
        .map(|chunk| ChunkOutput {
            index: chunk.index,
            offset: chunk.offset,
            len: chunk.len,
            running_crc: crc_string(chunk.running_crc),
        })
        .collect();
    let rows: Vec<Vec<String>> = chunks
        .iter()
        .map(|chunk| {
            vec![
                chunk.index.to_string(),
                chunk.offset.to_string(),
                chunk.len.to_string(),
                chunk.running_crc.clone(),
            ]
        })
        .collect();

    let out = PlanOutput {
        file: args.path.display().to_string(),
        size: plan.total_len(),
        chunk_size: plan.chunk_size(),
        crc: crc_string(plan.crc()),
        increment: plan.increment(),
        chunks,
    };
    let fields = [
        ("file", out.file.clone()),
        ("size", out.size.to_string()),
        ("chunk size", out.chunk_size.to_string()),
        ("chunks", out.chunks.len().to_string()),
        ("crc", out.crc.clone()),
        ("progress per chunk", format!("{:.2}%", out.increment * 100.0)),
    ];
    print_rows(
        &out,
        &fields,
        &["INDEX", "OFFSET", "LEN", "RUNNING CRC"],
        &rows,
        format,
    );
    Ok(())
}
