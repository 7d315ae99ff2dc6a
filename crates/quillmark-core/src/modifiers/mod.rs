//! Structural modifiers.
//!
//! Every modifier reads an `EditorState` and returns the next one, or `None`
//! when it doesn't apply. A modifier never returns a state equal to its input.

mod block_type;
mod blocks;
mod code_block;
mod inline;
mod text;

pub use block_type::{
    adjust_block_depth, change_current_block_type, leave_list, restore_block_type,
};
pub use blocks::{insert_empty_block, split_block};
pub use code_block::{exit_code_block, handle_new_code_block};
pub use inline::{change_current_inline_style, insert_entity_text, reset_inline_style};
pub use text::{insert_text, replace_text};
