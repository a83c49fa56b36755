//! Forward-only cursor over a text-unit tree.
//!
//! The cursor remembers the address of the next unit to lay out. Callers may
//! inspect finer units of the same content by passing a `depth`: the address is
//! extended with `depth` zero indices, so depth 1 is the first child of the
//! current unit, depth 2 its first grandchild and so on.

use smallvec::SmallVec;

use crate::text_unit::TextUnit;

/// Path of child indices from the root to a unit. Empty is the root itself.
pub type Address = SmallVec<[usize; 8]>;

/// Stateful walker over an immutable tree.
#[derive(Clone, Debug)]
pub struct TextUnitReader<'a> {
    root: &'a TextUnit,
    address: Address,
    complete: bool,
}

impl<'a> TextUnitReader<'a> {
    /// Cursor positioned on `root` itself.
    pub fn new(root: &'a TextUnit) -> Self {
        Self {
            root,
            address: Address::new(),
            complete: false,
        }
    }

    /// Address of the unit returned by `peek(0)`.
    pub fn address(&self) -> &[usize] {
        &self.address
    }

    /// True once every unit has been consumed. Never resets.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Unit `depth` levels below the current address, without consuming it.
    pub fn peek(&self, depth: usize) -> Option<&'a TextUnit> {
        if self.complete {
            return None;
        }
        self.root.get(&self.scaled_address(depth))
    }

    /// Consume the unit `depth` levels below the current address.
    ///
    /// The cursor moves to the next sibling of the consumed unit, or to the
    /// next sibling of the nearest ancestor that has one. When nothing is left
    /// the cursor becomes complete.
    pub fn advance(&mut self, depth: usize) -> Option<&'a TextUnit> {
        if self.complete {
            return None;
        }
        let target = self.scaled_address(depth);
        let unit = self.root.get(&target)?;

        match next_address(self.root, target) {
            Some(next) => self.address = next,
            None => {
                log::trace!("reader exhausted after {}", unit);
                self.complete = true;
            }
        }
        Some(unit)
    }

    fn scaled_address(&self, depth: usize) -> Address {
        let mut address = self.address.clone();
        address.extend(core::iter::repeat_n(0, depth));
        address
    }
}

fn next_address(root: &TextUnit, mut address: Address) -> Option<Address> {
    while let Some(last) = address.pop() {
        address.push(last + 1);
        if root.get(&address).is_some() {
            return Some(address);
        }
        address.pop();
    }
    None
}
