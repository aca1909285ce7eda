use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a widget stored in the [`WidgetTree`](crate::WidgetTree) arena.
    ///
    /// Handles are only meaningful for the frame that created them; the arena
    /// is cleared at the start of every frame.
    pub struct NodeId;
}
