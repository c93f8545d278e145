//! Server-driven table state and responsive overlay shells.
//!
//! - [`table`]: pagination, sorting, debounced filters, column layout and
//!   row selection, synchronized to a caller's refetch callback.
//! - [`shell`]: dialogs, menus and selects that render as desktop overlays
//!   or mobile bottom sheets from one shared state.
//! - [`settings`]: the durable key-value store column layouts persist to.

pub mod clock;
pub mod settings;
pub mod shell;
pub mod table;
pub mod timer;

pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::settings::{
        MemoryBackend, SettingsBackend, SettingsProvider, SqliteBackend, StorageError,
    };
    pub use crate::shell::{
        Activation, Align, Close, Content, DeviceClass, DeviceClassSource, FixedDevice,
        ItemHandle, ItemProps, Outline, ShellError, ShellRoot, ShellScope, Toolkit, Trigger,
        Viewport, ViewportConfig,
    };
    pub use crate::table::{
        ColumnDef, ColumnLayout, ColumnSort, FilterValue, QueryIntent, RefetchRequest,
        RequestSeq, SelectionMode, SortDirection, TableConfig, TableController, TableError,
        TableRow, TableState,
    };
    pub use crate::timer::Debounce;
}
