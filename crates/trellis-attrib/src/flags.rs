//! Per-descriptor behaviour flags.

use bitflags::bitflags;

bitflags! {
    /// Independent behaviour axes of one registered attribute.
    ///
    /// Both `READ_ONLY` and `WRITE_ONLY` absent means read-write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttribFlags: u16 {
        /// Read-write, inheritable, string valued, requires a mapped object.
        const NONE              = 0;

        /// Never looked up on the parent when reset.
        const NO_INHERIT        = 1 << 0;

        /// Callers should not treat the registered default as meaningful.
        const NO_DEFAULT_VALUE  = 1 << 1;

        /// Value is not textual; the string API cannot store it.
        const NO_STRING         = 1 << 2;

        /// Get/set work before the native handle exists.
        const NOT_MAPPED        = 1 << 3;

        /// Name carries one trailing id (`ITEM3`).
        const HAS_ID            = 1 << 4;

        /// Setting is rejected.
        const READ_ONLY         = 1 << 5;

        /// The getter is never called.
        const WRITE_ONLY        = 1 << 6;

        /// Name carries two trailing ids (`CELL3:5`).
        const HAS_ID2           = 1 << 7;

        /// The slot stores a callback format string, not a value.
        const CALLBACK          = 1 << 8;

        /// Excluded from bulk save.
        const NO_SAVE           = 1 << 9;

        /// Value names another object registered with a handle name.
        const IHANDLE_NAME      = 1 << 10;
    }
}

impl AttribFlags {
    /// Flags forced onto every single-id registration.
    pub const ID_IMPLIED: Self = Self::HAS_ID
        .union(Self::NO_INHERIT)
        .union(Self::NO_DEFAULT_VALUE);

    /// Flags forced onto every double-id registration.
    pub const ID2_IMPLIED: Self = Self::HAS_ID2
        .union(Self::NO_INHERIT)
        .union(Self::NO_DEFAULT_VALUE);

    /// Returns true if the attribute takes one or two trailing ids.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.intersects(Self::HAS_ID | Self::HAS_ID2)
    }

    /// Inheritance is string propagation, so non-string attributes never inherit.
    #[inline]
    pub fn is_inheritable(&self) -> bool {
        !self.intersects(Self::NO_INHERIT | Self::NO_STRING)
    }

    #[inline]
    pub fn allows_unmapped(&self) -> bool {
        self.contains(Self::NOT_MAPPED)
    }

    /// Returns true if the attribute takes part in bulk save and copy.
    #[inline]
    pub fn is_transferable(&self) -> bool {
        !self.intersects(Self::NO_STRING | Self::READ_ONLY | Self::WRITE_ONLY | Self::CALLBACK)
    }
}

impl Default for AttribFlags {
    fn default() -> Self {
        Self::NONE
    }
}
