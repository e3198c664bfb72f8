use std::fs;

use figkit_core::{Bbox, Point};
use figkit_designer::history::script;
use figkit_designer::{EditError, FigureRecipe, MemoryFigure, Session};
use figkit_settings::OutputSettings;
use tempfile::TempDir;

use crate::common::{assert_bbox, recipe, session};

const SCRIPT: &str = "import matplotlib.pyplot as plt\n\nfig = plt.figure(1)\nplt.show()\n";

fn fixture() -> (FigureRecipe, figkit_core::ElementId) {
    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    (recipe, a)
}

#[test]
fn test_save_then_reopen_restores_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.py");
    fs::write(&path, SCRIPT).unwrap();

    let (recipe, a) = fixture();
    let mut s = session(recipe.clone());
    s.select([a.clone()]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    assert!(s.is_dirty());

    assert_eq!(s.save_to(&path).unwrap(), 1);
    assert!(!s.is_dirty());
    assert_eq!(s.script_path(), Some(path.as_path()));

    let text = fs::read_to_string(&path).unwrap();
    let marker = OutputSettings::default().start_marker();
    let start = text.find(&marker).unwrap();
    assert!(start < text.find("plt.show()").unwrap());
    assert!(text.contains("plt.figure(1).axes[0].set_position(["));
    assert!(text.starts_with("import matplotlib.pyplot as plt\n"));

    let mut reopened = session(recipe);
    assert_eq!(reopened.open_script(&path).unwrap(), 1);
    assert_bbox(reopened.bbox_of(&a), Bbox::new(0.2, 0.1, 0.2, 0.2));
    assert_eq!(reopened.tracker().baseline().len(), 1);
    assert!(!reopened.is_dirty());
    // saved edits are the starting point, not undoable history
    assert!(matches!(reopened.undo(), Err(EditError::NothingToUndo)));
}

#[test]
fn test_repeated_save_replaces_block() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.py");
    fs::write(&path, SCRIPT).unwrap();

    let (recipe, a) = fixture();
    let mut s = session(recipe.clone());
    s.select([a.clone()]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.save_to(&path).unwrap();
    s.move_selection(Point::new(0.0, 0.1)).unwrap();
    assert_eq!(s.save().unwrap(), 1);

    let text = fs::read_to_string(&path).unwrap();
    let output = OutputSettings::default();
    assert_eq!(text.matches(&output.start_marker()).count(), 1);
    assert_eq!(text.matches(&output.end_marker()).count(), 1);
    assert_eq!(text.matches("set_position").count(), 1);

    let statements = script::extract_block(&text, &output, 1).unwrap();
    let mut reopened = session(recipe);
    reopened.open_script(&path).unwrap();
    assert_eq!(statements.len(), 1);
    assert_bbox(reopened.bbox_of(&a), Bbox::new(0.2, 0.2, 0.2, 0.2));
}

#[test]
fn test_edits_after_reopen_build_on_baseline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.py");

    let mut recipe = recipe();
    let a = recipe.add_axes(Bbox::new(0.1, 0.1, 0.2, 0.2));
    let b = recipe.add_axes(Bbox::new(0.5, 0.5, 0.2, 0.2));
    let mut s = session(recipe.clone());
    s.select([a.clone()]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.save_to(&path).unwrap();

    let mut reopened = session(recipe);
    reopened.open_script(&path).unwrap();
    reopened.select([b.clone()]);
    reopened.move_selection(Point::new(0.0, 0.1)).unwrap();
    reopened.undo().unwrap();
    // the baseline survives undo
    assert_bbox(reopened.bbox_of(&a), Bbox::new(0.2, 0.1, 0.2, 0.2));
    assert_bbox(reopened.bbox_of(&b), Bbox::new(0.5, 0.5, 0.2, 0.2));

    reopened.redo().unwrap();
    assert_eq!(reopened.save().unwrap(), 2);
    assert_eq!(reopened.generated_code().len(), 2);
}

#[test]
fn test_blocks_of_two_figures_share_a_script() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figures.py");
    fs::write(&path, SCRIPT).unwrap();

    let (first, a) = fixture();
    let mut second = FigureRecipe::new(2, 4.0, 3.0, 100.0);
    let c = second.add_axes(Bbox::new(0.2, 0.2, 0.5, 0.5));

    let mut s1 = session(first.clone());
    s1.select([a.clone()]);
    s1.move_selection(Point::new(0.1, 0.0)).unwrap();
    s1.save_to(&path).unwrap();

    let mut s2 = Session::new(MemoryFigure::new(second.clone()));
    s2.select([c.clone()]);
    s2.move_selection(Point::new(0.0, 0.1)).unwrap();
    s2.move_selection(Point::new(0.1, 0.0)).unwrap();
    s2.save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[figure 1]"));
    assert!(text.contains("[figure 2]"));

    let mut r1 = session(first);
    let mut r2 = Session::new(MemoryFigure::new(second));
    assert_eq!(r1.open_script(&path).unwrap(), 1);
    assert_eq!(r2.open_script(&path).unwrap(), 1);
    assert_bbox(r2.bbox_of(&c), Bbox::new(0.3, 0.3, 0.5, 0.5));
}

#[test]
fn test_failed_save_leaves_script_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.py");
    let output = OutputSettings::default();
    let broken = format!("{}\n{}\nplt.figure(1).axes[0].set_position([0, 0, 1, 1])\n", SCRIPT, output.start_marker());
    fs::write(&path, &broken).unwrap();

    let (recipe, a) = fixture();
    let mut s = session(recipe);
    s.select([a]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();

    assert!(matches!(s.save_to(&path), Err(EditError::Parse { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    assert!(s.is_dirty());
    assert!(s.script_path().is_none());
}

#[test]
fn test_save_without_script() {
    let mut s = session(recipe());
    assert!(matches!(s.save(), Err(EditError::NoScript(1))));
}

#[test]
fn test_open_missing_script_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new_figure.py");

    let (recipe, a) = fixture();
    let mut s = session(recipe);
    assert_eq!(s.open_script(&path).unwrap(), 0);
    s.select([a]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with(&format!("{}\n", OutputSettings::default().end_marker())));
}

#[test]
fn test_pre_save_hook_sees_compacted_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.py");
    let seen = std::rc::Rc::new(std::cell::Cell::new(0usize));
    let counter = seen.clone();

    let (recipe, a) = fixture();
    let mut s = session(recipe);
    s.on_pre_save(move |_, entries| counter.set(entries.len()));
    s.select([a]);
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.move_selection(Point::new(0.1, 0.0)).unwrap();
    s.save_to(&path).unwrap();

    assert_eq!(seen.get(), 1);
}
