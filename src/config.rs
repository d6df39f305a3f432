use std::path::Path;
use std::path::PathBuf;

/// Output settings for one reporting run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Directory receiving one document per customer
    pub output_dir: PathBuf,
    /// File name of the bundle written next to the documents
    pub archive_name: String,
    /// Text placed before the customer name in each document title
    pub title_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            output_dir: PathBuf::from("relatorios"),
            archive_name: "relatorios.zip".to_owned(),
            title_prefix: "Relatório - ".to_owned(),
        }
    }
}

impl ReportConfig {
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_archive_name(mut self, archive_name: &str) -> Self {
        self.archive_name = archive_name.to_owned();
        self
    }

    pub fn with_title_prefix(mut self, title_prefix: &str) -> Self {
        self.title_prefix = title_prefix.to_owned();
        self
    }

    /// Full path of the archive: `<output_dir>/<archive_name>`.
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_name)
    }
}
