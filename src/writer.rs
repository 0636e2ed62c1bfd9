//! Rendering a finished graph and shipping it to a stream, a file, or an
//! HTTP endpoint.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::descriptor::Descriptor;
use crate::errors::{Result, SysGraphError};
use crate::graph::{graph_triples, GraphDocument, ResourceGraph};
use crate::meta::MetaInformation;
use crate::types::OutputFormat;

#[derive(Serialize)]
struct JsonOutput<'a> {
    graph: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    meta: BTreeMap<String, String>,
    #[serde(flatten)]
    document: GraphDocument,
}

/// Renders `graph` in the requested format.
///
/// `json` produces one pretty-printed document; `triples` produces one JSON
/// triple per line, followed by the meta-information container if any.
pub fn render(
    graph: &ResourceGraph,
    descriptor: &Descriptor,
    meta: &MetaInformation,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let output = JsonOutput {
                graph: meta.id(),
                meta: meta.properties().clone(),
                document: graph.to_document(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Triples => {
            let mut triples = graph_triples(graph, descriptor);
            meta.customize(&mut triples, descriptor)?;
            let mut out = String::new();
            for triple in &triples {
                out.push_str(&serde_json::to_string(triple)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Destination for a rendered graph.
pub trait GraphWriter {
    /// Writes the rendered payload.
    fn write(&mut self, payload: &str, format: OutputFormat) -> Result<()>;

    /// Human-readable description of where the payload goes.
    fn target(&self) -> String;
}

/// Writes to any [`Write`], stdout by default.
pub struct StreamWriter<W: Write> {
    out: W,
}

impl StreamWriter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> StreamWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GraphWriter for StreamWriter<W> {
    fn write(&mut self, payload: &str, _format: OutputFormat) -> Result<()> {
        self.out.write_all(payload.as_bytes())?;
        if !payload.ends_with('\n') {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn target(&self) -> String {
        "stream".to_string()
    }
}

/// Writes to a file through a temporary sibling and a rename.
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphWriter for FileWriter {
    fn write(&mut self, payload: &str, _format: OutputFormat) -> Result<()> {
        let write_err = |e: std::io::Error| SysGraphError::Write {
            message: e.to_string(),
            target: self.path.display().to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        tracing::info!(path = %self.path.display(), bytes = payload.len(), "graph written");
        Ok(())
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

/// Uploads with an HTTP PUT to `{base}/{graph id}`.
pub struct HttpWriter {
    url: String,
}

impl HttpWriter {
    pub fn new(base: &str, graph_id: &str) -> Self {
        Self {
            url: format!("{}/{}", base.trim_end_matches('/'), graph_id),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GraphWriter for HttpWriter {
    fn write(&mut self, payload: &str, format: OutputFormat) -> Result<()> {
        let response = ureq::put(&self.url)
            .header("Content-Type", format.content_type())
            .send(payload)
            .map_err(|e| SysGraphError::Write {
                message: e.to_string(),
                target: self.url.clone(),
            })?;
        tracing::info!(url = %self.url, status = response.status().as_u16(), "graph uploaded");
        Ok(())
    }

    fn target(&self) -> String {
        self.url.clone()
    }
}

/// Picks a writer for `target`: stdout when absent, HTTP for `http(s)://`
/// targets, a file otherwise.
pub fn writer_for(target: Option<&str>, graph_id: &str) -> Box<dyn GraphWriter> {
    match target {
        None => Box::new(StreamWriter::stdout()),
        Some(t) if t.starts_with("http://") || t.starts_with("https://") => {
            Box::new(HttpWriter::new(t, graph_id))
        }
        Some(t) => Box::new(FileWriter::new(t)),
    }
}
