//! JSON dump of a render graph, for debugging layout passes and diffing
//! fixture output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::render::RenderGraph;

pub fn dump_string(graph: &RenderGraph) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

pub fn write_dump(path: &Path, graph: &RenderGraph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, graph)?;
    Ok(())
}
