//! Doxygen build engine

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::BuildEngineKind;
use crate::storage::{DocumentModel, Settings};

use super::engine::flush_inputs;
use super::{BuildEngine, BuildError, ToolOutput, ToolRunner};

/// Builds documents by running the `doxygen` executable
#[derive(Debug, Clone)]
pub struct DoxygenEngine {
    program: String,

    /// Where Doxyfiles and aggregated sources go; the output directory if unset
    work_dir: Option<PathBuf>,

    runner: ToolRunner,
}

impl DoxygenEngine {
    pub fn new(program: impl Into<String>) -> Self {
        let settings = Settings::default();
        Self {
            program: program.into(),
            work_dir: None,
            runner: ToolRunner::new(settings.build_timeout()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.doxygen_path.clone(),
            work_dir: settings.work_dir.clone(),
            runner: ToolRunner::new(settings.build_timeout()),
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = ToolRunner::new(timeout);
        self
    }

    fn run(&self, args: &[&OsStr], cwd: Option<&Path>) -> Result<ToolOutput, BuildError> {
        let output = self.runner.run(&self.program, args, cwd)?;
        if !output.success() {
            return Err(BuildError::ToolFailed {
                program: self.program.clone(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        if !output.stderr.trim().is_empty() {
            debug!("{} stderr: {}", self.program, output.stderr.trim());
        }
        Ok(output)
    }
}

/// Wraps the input files, in order, in one Doxygen comment block
fn aggregate_source(document: &mut DocumentModel) -> Result<String, BuildError> {
    let mut source = String::from("/*!\n");
    for index in 0..document.input_file_count() {
        let text = document
            .input_file_contents(index)
            .map_err(BuildError::Flush)?;
        source.push_str(text);
        if !text.ends_with('\n') {
            source.push('\n');
        }
    }
    source.push_str("\n**/\n");
    Ok(source)
}

/// Settings appended to the generated Doxyfile
fn doxyfile_items(source: &Path, out_dir: &Path, title: &str) -> String {
    format!(
        "\n# CrossDocs appended items:\nINPUT += {}\nOUTPUT_DIRECTORY = {}\nGENERATE_TREEVIEW = YES\nPROJECT_NAME = \"{}\"\n",
        source.display(),
        out_dir.display(),
        title.replace('"', "'")
    )
}

impl BuildEngine for DoxygenEngine {
    fn kind(&self) -> BuildEngineKind {
        BuildEngineKind::Doxygen
    }

    fn build(
        &self,
        document: &mut DocumentModel,
        out_dir: &Path,
        project_name: &str,
    ) -> Result<PathBuf, BuildError> {
        flush_inputs(document)?;

        let tag = document.tag().to_string();
        let work_dir = self.work_dir.clone().unwrap_or_else(|| out_dir.to_path_buf());
        let doc_out = out_dir.join(&tag);

        for dir in [&work_dir, &doc_out] {
            fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
        }

        let doxyfile = work_dir.join(format!("{}_Doxyfile", tag));
        debug!("Generating {}", doxyfile.display());
        self.run(&[OsStr::new("-s"), OsStr::new("-g"), doxyfile.as_os_str()], None)?;

        let source_path = work_dir.join(format!("{}.dox", tag));
        let source = aggregate_source(document)?;
        fs::write(&source_path, source).map_err(|e| BuildError::io(&source_path, e))?;

        let title = if project_name.is_empty() {
            document.name().to_string()
        } else {
            format!("{}: {}", project_name, document.name())
        };

        let mut config = fs::read_to_string(&doxyfile).map_err(|e| BuildError::io(&doxyfile, e))?;
        config.push_str(&doxyfile_items(&source_path, &doc_out, &title));
        fs::write(&doxyfile, config).map_err(|e| BuildError::io(&doxyfile, e))?;

        let output = self.run(&[doxyfile.as_os_str()], Some(&work_dir))?;
        debug!("{} output:\n{}", self.program, output.stdout);

        let artifact = doc_out.join("html").join("index.html");
        if !artifact.exists() {
            warn!("Build finished but {} was not produced", artifact.display());
        }
        Ok(artifact)
    }
}
