//! Undo, redo and the script the edits live in.

use std::fs;
use std::io;
use std::path::Path;

use figkit_core::AppEvent;

use super::Session;
use crate::backend::FigureBackend;
use crate::error::{EditError, EditResult};
use crate::history::{codegen, script, ChangeEntry, Statement};

impl<B: FigureBackend> Session<B> {
    pub fn undo(&mut self) -> EditResult<()> {
        self.ensure_idle()?;
        let size = self.backend.size_inches();
        self.tracker.undo(&mut self.backend)?;
        self.after_replay(size);
        Ok(())
    }

    pub fn redo(&mut self) -> EditResult<()> {
        self.ensure_idle()?;
        let size = self.backend.size_inches();
        self.tracker.redo(&mut self.backend)?;
        self.after_replay(size);
        Ok(())
    }

    /// Associates the session with a script and applies the edits already
    /// saved in its generated block.
    ///
    /// A missing file is not an error; it is created on the first save.
    /// Returns the number of statements found.
    pub fn open_script(&mut self, path: impl AsRef<Path>) -> EditResult<usize> {
        self.ensure_idle()?;
        let path = path.as_ref();
        let statements = match fs::read_to_string(path) {
            Ok(text) => script::extract_block(&text, &self.output, self.figure_number())?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        let count = statements.len();
        let size = self.backend.size_inches();
        self.tracker.seed_baseline(statements);
        self.tracker.replay(&mut self.backend)?;
        self.after_replay(size);
        self.script = Some(path.to_path_buf());
        tracing::info!("Opened {} ({} generated statements)", path.display(), count);
        Ok(count)
    }

    /// Saves into the session's script.
    pub fn save(&mut self) -> EditResult<usize> {
        let path = self
            .script
            .clone()
            .ok_or_else(|| EditError::NoScript(self.figure_number()))?;
        self.save_to(&path)
    }

    /// Writes the compacted edits as the figure's generated block of `path`
    /// and makes it the session's script.
    ///
    /// Nothing is written when the statements do not round-trip. Returns
    /// the number of statements written.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> EditResult<usize> {
        self.ensure_idle()?;
        let path = path.as_ref();
        let compacted = self.tracker.compacted();
        let statements: Vec<Statement> = compacted.iter().map(ChangeEntry::statement).collect();
        let lines = codegen::render_verified(&statements)?;

        for hook in self.pre_save_hooks.iter_mut() {
            hook(path, &compacted);
        }

        let existing = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        let text = script::splice_block(&existing, &self.output, self.figure_number(), &lines)?;
        script::write_atomic(path, &text)?;

        self.tracker.mark_saved();
        self.script = Some(path.to_path_buf());
        self.bus.publish(AppEvent::Saved {
            path: path.to_path_buf(),
            statements: lines.len(),
        });
        tracing::info!("Saved {} statements to {}", lines.len(), path.display());
        Ok(lines.len())
    }

    /// Generated statements the next save would write.
    pub fn generated_code(&self) -> Vec<String> {
        self.tracker
            .compacted()
            .iter()
            .map(|e| e.statement().to_string())
            .collect()
    }

    /// `size_before` is the figure size in inches before the replay.
    fn after_replay(&mut self, size_before: (f64, f64)) {
        self.prune_stale();
        let (w, h) = self.backend.size_inches();
        self.viewport.set_figure_size(w, h, self.backend.dpi());
        if (w, h) != size_before {
            self.bus.publish(AppEvent::FigureSizeChanged {
                width_in: w,
                height_in: h,
            });
        }
        self.bus.publish(AppEvent::CanvasChanged);
    }
}
