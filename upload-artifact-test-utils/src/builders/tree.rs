//! Builder for in-memory workspaces

use std::path::{Path, PathBuf};

use crate::mocks::MockFileSystem;

/// Builds a [`MockFileSystem`] from paths relative to a workspace directory
///
/// ```
/// use upload_artifact_test_utils::TreeBuilder;
///
/// let fs = TreeBuilder::new("/work")
///     .file("build/a.txt")
///     .file("build/b.txt")
///     .build();
/// assert!(fs.file_exists("/work/build/a.txt"));
/// ```
pub struct TreeBuilder {
    workspace: PathBuf,
    fs: MockFileSystem,
}

impl TreeBuilder {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        let mut fs = MockFileSystem::new();
        fs.create_directory(&workspace);
        Self { workspace, fs }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Add a file whose content is its own relative path
    pub fn file(self, relative: &str) -> Self {
        let content = relative.as_bytes().to_vec();
        self.file_with_content(relative, &content)
    }

    pub fn file_with_content(mut self, relative: &str, content: &[u8]) -> Self {
        self.fs.add_file(self.workspace.join(relative), content);
        self
    }

    pub fn files(self, relative: &[&str]) -> Self {
        relative.iter().fold(self, |builder, path| builder.file(path))
    }

    /// Add `count` files named `file-00000.txt` onwards under `dir`
    pub fn many_files(mut self, dir: &str, count: usize) -> Self {
        for index in 0..count {
            let path = self.workspace.join(dir).join(format!("file-{index:05}.txt"));
            self.fs.add_file(path, b"");
        }
        self
    }

    pub fn directory(mut self, relative: &str) -> Self {
        self.fs.create_directory(self.workspace.join(relative));
        self
    }

    pub fn build(self) -> MockFileSystem {
        self.fs
    }
}
