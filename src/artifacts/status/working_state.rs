use bitflags::bitflags;

bitflags! {
    /// Repository state recomputed on every command from the tree comparison and
    /// the index size. No flags set means clean.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WorkingState: u8 {
        /// The index holds bundles not yet committed
        const STAGED = 0b01;
        /// The working tree differs from the last-state mirror
        const DIRTY = 0b10;
    }
}

impl WorkingState {
    pub fn from_parts(has_staged: bool, has_changes: bool) -> Self {
        let mut state = Self::empty();
        state.set(Self::STAGED, has_staged);
        state.set(Self::DIRTY, has_changes);
        state
    }

    pub fn is_clean(&self) -> bool {
        self.is_empty()
    }
}
