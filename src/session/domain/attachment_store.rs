//! Capacity-bounded, insertion-ordered store of pending attachments.

use super::{Attachment, AttachmentId};
use crate::session::error::AttachmentError;

/// Hard upper bound on pending attachments.
pub const MAX_ATTACHMENTS: usize = 5;

/// Pending attachments awaiting the next send.
///
/// # Invariants
///
/// - `len() <= capacity() <= MAX_ATTACHMENTS` at all times; the capacity
///   check happens before insertion.
/// - Identifiers are unique.
/// - Insertion order is preserved, including across removals.
///
/// # Examples
///
/// ```
/// use hoverchat::session::domain::{Attachment, AttachmentId, AttachmentStore, PreviewData};
///
/// let mut store = AttachmentStore::new();
/// let size = store
///     .add(Attachment::new(AttachmentId::new("a"), PreviewData::new("p")))
///     .expect("store has room");
/// assert_eq!(size, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentStore {
    items: Vec<Attachment>,
    capacity: usize,
}

impl AttachmentStore {
    /// Creates an empty store holding up to [`MAX_ATTACHMENTS`] items.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_capacity(MAX_ATTACHMENTS)
    }

    /// Creates an empty store with a smaller capacity.
    ///
    /// Values above [`MAX_ATTACHMENTS`] are clamped.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        let clamped = if capacity > MAX_ATTACHMENTS {
            MAX_ATTACHMENTS
        } else {
            capacity
        };
        Self {
            items: Vec::new(),
            capacity: clamped,
        }
    }

    /// Appends an attachment and returns the new size.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::CapacityExceeded`] when the store is full
    /// and [`AttachmentError::DuplicateAttachment`] when the identifier is
    /// already pending. The store is unchanged in both cases.
    pub fn add(&mut self, attachment: Attachment) -> Result<usize, AttachmentError> {
        if self.is_full() {
            return Err(AttachmentError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.contains(attachment.id()) {
            return Err(AttachmentError::DuplicateAttachment(
                attachment.id().clone(),
            ));
        }
        self.items.push(attachment);
        Ok(self.items.len())
    }

    /// Removes the attachment with `id`, keeping the others in order.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotFound`] when no such attachment is
    /// pending. Repeated removal of an absent id fails the same way.
    pub fn remove(&mut self, id: &AttachmentId) -> Result<Attachment, AttachmentError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AttachmentError::NotFound(id.clone()))?;
        Ok(self.items.remove(position))
    }

    /// Removes every attachment whose id is in `ids` and returns how many
    /// were removed. Ids that are not pending are ignored.
    pub fn release(&mut self, ids: &[AttachmentId]) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(item.id()));
        before.saturating_sub(self.items.len())
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns an ordered copy of the pending attachments.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Attachment> {
        self.items.clone()
    }

    /// Returns `true` if an attachment with `id` is pending.
    #[must_use]
    pub fn contains(&self, id: &AttachmentId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Returns the number of pending attachments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the maximum number of pending attachments.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if another attachment would be rejected.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

impl Default for AttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}
