//! Test helpers for composing CLI workspaces on disk.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Entity documents covering a species, a breed and a located city.
pub(super) const SAMPLE_DOCUMENTS: &str = concat!(
    r#"{"id":"Q7368","claims":{"P31":[{"mainsnak":{"snaktype":"value","datavalue":{"type":"wikibase-entityid","value":{"id":"Q16521"}}}}]}}"#,
    "\n",
    r#"{"id":"Q16521","claims":{"P279":[{"mainsnak":{"snaktype":"value","datavalue":{"type":"wikibase-entityid","value":{"id":"Q2116951"}}}}]}}"#,
    "\n",
    r#"{"id":"Q31487","claims":{"P31":[{"mainsnak":{"snaktype":"value","datavalue":{"type":"wikibase-entityid","value":{"id":"Q515"}}}}],"P625":[{"mainsnak":{"snaktype":"value","datavalue":{"type":"globecoordinate","value":{"latitude":50.061389,"longitude":19.938333,"globe":"http://www.wikidata.org/entity/Q2"}}}}]}}"#,
    "\n",
);

/// Temporary directory holding a cache, documents and feature files.
pub(super) struct CliWorkspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl CliWorkspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn cache_db(&self) -> Utf8PathBuf {
        self.root.join("cache/wikidata.db")
    }

    pub(super) fn documents(&self) -> Utf8PathBuf {
        self.root.join("entities.ndjson")
    }

    pub(super) fn features(&self) -> Utf8PathBuf {
        self.root.join("features.json")
    }

    pub(super) fn write_documents(&self, contents: &str) -> Utf8PathBuf {
        let path = self.documents();
        fs::write(&path, contents).expect("write documents");
        path
    }

    pub(super) fn write_features(&self, contents: &str) -> Utf8PathBuf {
        let path = self.features();
        fs::write(&path, contents).expect("write features");
        path
    }
}
