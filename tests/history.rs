use egui::{Color32, Pos2};
use raster_paint::{Command, EditorConfig, EditorState, ToolKind};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> EditorState {
    init_logging();
    EditorState::new(EditorConfig {
        canvas_width: 64,
        canvas_height: 48,
        ..Default::default()
    })
    .unwrap()
}

// Helper to run one full pointer gesture from `from` to `to`
fn gesture(editor: &mut EditorState, from: Pos2, to: Pos2) {
    editor.apply(Command::PointerDown(from)).unwrap();
    editor.apply(Command::PointerMove(to)).unwrap();
    editor.apply(Command::PointerUp(to)).unwrap();
}

#[test]
fn undo_with_empty_stack_changes_nothing() {
    let mut editor = editor();
    let before = editor.composite();

    editor.apply(Command::Undo).unwrap();
    editor.apply(Command::Redo).unwrap();

    assert_eq!(editor.composite(), before);
    assert!(!editor.history().can_undo());
    assert!(!editor.history().can_redo());
}

#[test]
fn n_actions_then_n_undos_restore_the_start() {
    let mut editor = editor();
    let start = editor.composite();

    gesture(&mut editor, Pos2::new(5.0, 5.0), Pos2::new(40.0, 5.0));
    editor.apply(Command::SetTool(ToolKind::Rectangle)).unwrap();
    editor.apply(Command::SetColor(Color32::BLUE)).unwrap();
    gesture(&mut editor, Pos2::new(10.0, 10.0), Pos2::new(30.0, 30.0));
    editor.apply(Command::AddLayer).unwrap();
    editor.apply(Command::SetTool(ToolKind::Circle)).unwrap();
    gesture(&mut editor, Pos2::new(32.0, 24.0), Pos2::new(42.0, 24.0));
    editor.apply(Command::SetTool(ToolKind::Eraser)).unwrap();
    editor.apply(Command::SelectLayer(0)).unwrap();
    gesture(&mut editor, Pos2::new(0.0, 5.0), Pos2::new(20.0, 5.0));

    assert_eq!(editor.history().undo_len(), 4);
    assert_ne!(editor.composite(), start);

    for _ in 0..4 {
        editor.apply(Command::Undo).unwrap();
    }
    assert_eq!(editor.composite(), start);
    assert!(!editor.history().can_undo());
}

#[test]
fn m_undos_then_m_redos_restore_the_end() {
    let mut editor = editor();
    gesture(&mut editor, Pos2::new(5.0, 5.0), Pos2::new(40.0, 5.0));
    gesture(&mut editor, Pos2::new(5.0, 20.0), Pos2::new(40.0, 20.0));
    gesture(&mut editor, Pos2::new(5.0, 35.0), Pos2::new(40.0, 35.0));
    let end = editor.composite();

    editor.apply(Command::Undo).unwrap();
    editor.apply(Command::Undo).unwrap();
    assert_eq!(editor.history().redo_len(), 2);
    assert_ne!(editor.composite(), end);

    editor.apply(Command::Redo).unwrap();
    editor.apply(Command::Redo).unwrap();
    assert_eq!(editor.composite(), end);
}

#[test]
fn new_action_clears_redo() {
    let mut editor = editor();
    gesture(&mut editor, Pos2::new(5.0, 5.0), Pos2::new(40.0, 5.0));
    editor.apply(Command::Undo).unwrap();
    assert!(editor.history().can_redo());

    gesture(&mut editor, Pos2::new(5.0, 20.0), Pos2::new(40.0, 20.0));
    assert!(!editor.history().can_redo());

    let after = editor.composite();
    editor.apply(Command::Redo).unwrap();
    assert_eq!(editor.composite(), after);
}

#[test]
fn one_snapshot_per_gesture() {
    let mut editor = editor();
    editor.apply(Command::PointerDown(Pos2::new(1.0, 1.0))).unwrap();
    for x in 2..30 {
        editor
            .apply(Command::PointerMove(Pos2::new(x as f32, 1.0)))
            .unwrap();
    }
    editor.apply(Command::PointerUp(Pos2::new(30.0, 1.0))).unwrap();
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn undo_restores_the_layer_it_recorded() {
    let mut editor = editor();
    editor.apply(Command::AddLayer).unwrap();
    gesture(&mut editor, Pos2::new(5.0, 5.0), Pos2::new(40.0, 5.0));
    let drawn_on = editor.document().current_layer().id;

    // Move the drawn layer under the other one and switch away from it
    editor.apply(Command::ReorderLayer { from: 1, to: 0 }).unwrap();
    editor.apply(Command::SelectLayer(1)).unwrap();
    editor.apply(Command::Undo).unwrap();

    let layer = &editor.document().layers()[0];
    assert_eq!(layer.id, drawn_on);
    assert!(layer.buffer().is_transparent());
}

#[test]
fn undo_after_deleting_the_layer_is_a_no_op() {
    let mut editor = editor();
    editor.apply(Command::AddLayer).unwrap();
    gesture(&mut editor, Pos2::new(5.0, 5.0), Pos2::new(40.0, 5.0));
    editor.apply(Command::DeleteLayer(1)).unwrap();
    let before = editor.composite();

    editor.apply(Command::Undo).unwrap();
    assert_eq!(editor.composite(), before);
    assert!(!editor.history().can_undo());
}
