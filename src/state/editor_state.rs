use crate::command::{Command, History};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::file_handler;
use crate::image::PixelBuffer;
use crate::loader::{ImageLoads, LoadTarget, LoadedImage, PendingLoad};
use crate::selection::SelectionEngine;
use crate::tools::{ToolController, ToolSettings};
use crate::view::ViewTransform;
use ab_glyph::FontArc;
use std::future::Future;

/// The whole editor: the document plus everything that acts on it.
///
/// All input goes through [`EditorState::apply`]. The host renders
/// [`EditorState::composite`] and the live selection overlay, and drives
/// image loads with whatever executor it has.
pub struct EditorState {
    pub(crate) config: EditorConfig,
    pub(crate) document: Document,
    pub(crate) history: History,
    pub(crate) selection: SelectionEngine,
    pub(crate) tools: ToolController,
    pub(crate) view: ViewTransform,
    pub(crate) loads: ImageLoads,
    pub(crate) font: Option<FontArc>,
    /// Bumped whenever a command may have changed the composite
    revision: u64,
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("document", &self.document)
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("tools", &self.tools)
            .field("view", &self.view)
            .field("font", &self.font.is_some())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        let document = Document::new(config.canvas_width, config.canvas_height)?;
        log::info!(
            "Created editor with a {}x{} canvas",
            config.canvas_width,
            config.canvas_height
        );
        Ok(Self {
            history: History::new(),
            selection: SelectionEngine::new(config.min_selection_size, config.handle_radius),
            tools: ToolController::new(ToolSettings {
                color: config.brush_color,
                size: config.brush_size,
                font_size: config.font_size,
            }),
            view: ViewTransform::new(config.zoom),
            loads: ImageLoads::new(),
            font: None,
            revision: 0,
            document,
            config,
        })
    }

    /// Applies one command. On error the editor is left as it was before it.
    pub fn apply(&mut self, command: Command) -> EditorResult<()> {
        let touches_pixels = command.touches_pixels();
        command.execute(self)?;
        if touches_pixels {
            self.revision += 1;
        }
        Ok(())
    }

    /// Builds an editor and feeds it a recorded command log.
    ///
    /// Commands that were rejected when recorded are rejected again and
    /// skipped; any other error aborts the replay.
    pub fn replay(
        config: EditorConfig,
        commands: impl IntoIterator<Item = Command>,
    ) -> EditorResult<Self> {
        let mut state = Self::new(config)?;
        for command in commands {
            match state.apply(command) {
                Ok(()) => {}
                Err(err) if err.is_rejection() => log::debug!("Replay skipped command: {err}"),
                Err(err) => return Err(err),
            }
        }
        Ok(state)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn composite(&self) -> PixelBuffer {
        self.document.composite()
    }

    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        file_handler::export_png(&self.document)
    }

    /// Sets the face used by the text tool
    pub fn load_font(&mut self, bytes: Vec<u8>) -> EditorResult<()> {
        self.font = Some(FontArc::try_from_vec(bytes)?);
        log::info!("Loaded text tool font");
        Ok(())
    }

    /// Starts loading an image for `target`, superseding any load in flight for it.
    ///
    /// Drive the returned future to completion and hand its output to
    /// [`EditorState::finish_image_load`].
    pub fn begin_image_load<F>(&mut self, target: LoadTarget, source: F) -> PendingLoad
    where
        F: Future<Output = std::io::Result<Vec<u8>>> + Send + 'static,
    {
        self.loads.begin(target, source)
    }

    pub fn cancel_image_load(&mut self, target: LoadTarget) {
        self.loads.cancel(target);
    }

    pub fn is_load_pending(&self, target: LoadTarget) -> bool {
        self.loads.is_pending(target)
    }

    /// Applies a finished load. Returns `false` if it was superseded or cancelled.
    pub fn finish_image_load(&mut self, loaded: LoadedImage) -> EditorResult<bool> {
        let LoadedImage { ticket, result } = loaded;
        if !self.loads.finish(ticket) {
            log::warn!("Dropping stale image load for {:?}", ticket.target);
            return Ok(false);
        }
        let image = match result {
            Ok(image) => image,
            Err(EditorError::LoadCancelled) => return Ok(false),
            Err(err) => {
                log::error!("Image load for {:?} failed: {err}", ticket.target);
                return Err(err);
            }
        };
        let command = match ticket.target {
            LoadTarget::PlaceImage => Command::PlaceImage(image),
            LoadTarget::OpenDocument => Command::OpenImage(image),
        };
        self.apply(command)?;
        Ok(true)
    }

    /// Commits the live selection and drops any unfinished tool gesture
    pub(crate) fn settle(&mut self) {
        self.selection.commit();
        self.tools.cancel_gesture();
    }

    pub(crate) fn new_canvas(&mut self, width: u32, height: u32) -> EditorResult<()> {
        let document = Document::new(width, height)?;
        self.settle();
        self.loads.cancel(LoadTarget::OpenDocument);
        self.document = document;
        self.history.clear();
        log::info!("New {width}x{height} canvas");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, Pos2};

    fn small_editor() -> EditorState {
        EditorState::new(EditorConfig {
            canvas_width: 40,
            canvas_height: 30,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EditorConfig {
            canvas_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            EditorState::new(config),
            Err(EditorError::InvalidDimension(_))
        ));
    }

    #[test]
    fn revision_tracks_pixel_commands() {
        let mut editor = small_editor();
        editor.apply(Command::ZoomIn).unwrap();
        assert_eq!(editor.revision(), 0);
        editor.apply(Command::AddLayer).unwrap();
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn failed_command_leaves_revision() {
        let mut editor = small_editor();
        assert!(editor.apply(Command::DeleteLayer(0)).is_err());
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn new_canvas_resets_document_and_history() {
        let mut editor = small_editor();
        editor.apply(Command::PointerDown(Pos2::new(5.0, 5.0))).unwrap();
        editor.apply(Command::PointerUp(Pos2::new(9.0, 5.0))).unwrap();
        editor.apply(Command::AddLayer).unwrap();
        assert!(editor.history().can_undo());

        editor
            .apply(Command::NewCanvas {
                width: 64,
                height: 48,
            })
            .unwrap();
        assert_eq!(editor.document().width(), 64);
        assert_eq!(editor.document().layer_count(), 1);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn new_canvas_commits_live_selection() {
        let mut editor = small_editor();
        editor
            .apply(Command::PlaceImage(PixelBuffer::filled(
                6,
                6,
                ::image::Rgba([0, 0, 255, 255]),
            )))
            .unwrap();
        editor.apply(Command::SetTool(crate::ToolKind::Select)).unwrap();
        editor.apply(Command::PointerDown(Pos2::new(20.0, 15.0))).unwrap();
        assert!(editor.selection().live().is_some());

        editor
            .apply(Command::NewCanvas {
                width: 20,
                height: 20,
            })
            .unwrap();
        assert!(editor.selection().is_idle());
        assert!(editor.composite().is_transparent());
    }

    #[test]
    fn invalid_new_canvas_keeps_document() {
        let mut editor = small_editor();
        let result = editor.apply(Command::NewCanvas {
            width: 0,
            height: 10,
        });
        assert!(matches!(result, Err(EditorError::InvalidDimension(_))));
        assert_eq!(editor.document().width(), 40);
    }

    #[test]
    fn text_without_font_is_rejected() {
        let mut editor = small_editor();
        let result = editor.apply(Command::PlaceText {
            position: Pos2::new(5.0, 20.0),
            text: "hi".to_owned(),
        });
        assert!(matches!(result, Err(EditorError::NoFont)));
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn color_change_is_used_by_next_stroke() {
        let mut editor = small_editor();
        editor.apply(Command::SetColor(Color32::RED)).unwrap();
        editor.apply(Command::SetBrushSize(3.0)).unwrap();
        editor.apply(Command::PointerDown(Pos2::new(10.0, 10.0))).unwrap();
        editor.apply(Command::PointerMove(Pos2::new(20.0, 10.0))).unwrap();
        editor.apply(Command::PointerUp(Pos2::new(20.0, 10.0))).unwrap();
        let pixel = editor.composite().pixel(15, 10).unwrap();
        assert_eq!(pixel.0, [255, 0, 0, 255]);
    }
}
