//! Attribute and class-signature vocabulary
//!
//! Names of the state attributes the game maintains, the accessibility
//! attributes this crate writes, and the generated class-name prefixes used
//! to locate elements by structural signature.

/// Letter currently shown in a tile or printed on a key.
pub const LETTER: &str = "letter";
/// Evaluation status of a tile: `correct`, `present`, `absent`, or empty.
pub const DATA_STATE: &str = "data-state";
/// Evaluation status mirrored onto keyboard keys.
pub const EVALUATION: &str = "evaluation";
/// Key identifier on keyboard buttons (letters plus `←` and `↵`).
pub const DATA_KEY: &str = "data-key";
/// Presence attribute marking a toggle control as switched on.
pub const CHECKED: &str = "checked";
/// Declared name of a form control.
pub const NAME: &str = "name";

/// Accessible name announced by assistive technology.
pub const ARIA_LABEL: &str = "aria-label";
/// Semantic role.
pub const ROLE: &str = "role";
/// Human-readable refinement of the role.
pub const ARIA_ROLEDESCRIPTION: &str = "aria-roledescription";
/// Live-region politeness setting.
pub const ARIA_LIVE: &str = "aria-live";
/// Announced checked state of a toggle.
pub const ARIA_CHECKED: &str = "aria-checked";
/// Hides purely decorative content from assistive technology.
pub const ARIA_HIDDEN: &str = "aria-hidden";
/// Whether a dialog blocks interaction with the rest of the page.
pub const ARIA_MODAL: &str = "aria-modal";
/// Keyboard focusability marker.
pub const TABINDEX: &str = "tabindex";

/// Generated class-name prefixes used for discovery. The game's build
/// pipeline appends a content hash, so matching is always prefix-based.
pub mod class {
    /// Game panel wrapping the board, keyboard and overlays.
    pub const GAME: &str = "App-module_game_";
    /// Board container.
    pub const BOARD: &str = "Board-module_board_";
    /// One guess row.
    pub const ROW: &str = "Row-module_row_";
    /// One letter tile.
    pub const TILE: &str = "Tile-module_tile_";
    /// Keyboard container.
    pub const KEYBOARD: &str = "Keyboard-module_keyboard_";
    /// One keyboard key.
    pub const KEY: &str = "Key-module_key_";
    /// Transient message region.
    pub const TOAST: &str = "Toaster-module";
    /// Help/informational overlay panel.
    pub const PAGE_OVERLAY: &str = "Page-module_page_";
    /// Close control of the help overlay.
    pub const PAGE_CLOSE: &str = "Page-module_close_";
    /// Close control of modal dialogs.
    pub const MODAL_CLOSE: &str = "Modal-module_close_";
    /// Decorative icon inside controls.
    pub const GAME_ICON: &str = "game-icon";
    /// Encapsulated switch inside toggle controls.
    pub const SWITCH: &str = "switch";
}
