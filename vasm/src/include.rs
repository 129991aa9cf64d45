use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::assembler::Assembler;

/// Canonicalizes `path` for cycle-detection purposes, falling back to the
/// path as given when it doesn't exist on disk (true for the synthetic
/// top-level filename a caller may pass to `assemble`).
pub(crate) fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl Assembler {
    /// Seeds the include-cycle guard with the top-level input file, so a
    /// self-`.include` is caught the same way a deeper cycle is.
    pub(crate) fn seed_include_stack(&mut self, top_level: &str) {
        self.include_stack.push(resolve_path(Path::new(top_level)));
    }

    pub(crate) fn include_file(&mut self, relative_path: &str) {
        let base = Path::new(&self.current_file).parent().map(Path::to_path_buf).unwrap_or_default();
        let candidate = base.join(relative_path);
        let resolved = resolve_path(&candidate);

        if self.include_stack.contains(&resolved) {
            self.error(format!("Circular inclusion: {}", relative_path));
            return;
        }

        let source = match fs::read_to_string(&candidate) {
            Ok(source) => source,
            Err(err) => {
                self.error(format!("Cannot read include file '{}': {}", relative_path, err));
                return;
            }
        };

        debug!("entering include {}", candidate.display());
        self.include_stack.push(resolved);
        self.process_source(relative_path, &source);
        self.include_stack.pop();
        debug!("leaving include {}", candidate.display());
    }
}
