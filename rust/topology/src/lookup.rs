// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag-based lookup of faces and coedges.
//!
//! Lookup is two-tier. [`exact`](TagLookup::exact_face) compares whole tags.
//! [`suffix_fallback`](TagLookup::suffix_fallback_face) compares only the
//! text after the last `|`, which keeps lineage tags such as
//! `parentId|localId` resolvable after the parent prefix was renumbered.
//! The fallback only runs for queries that contain a delimiter.
//!
//! Both tiers are linear scans and return the first match in Brep order,
//! then creation order. [`TagLookup::last_exact_face`] scans Breps from the
//! back instead.

use tracing::debug;

use crate::arena::Brep;
use crate::error::{Error, Result};
use crate::keys::*;

/// Separator between lineage segments of a tag.
pub const TAG_DELIMITER: char = '|';

/// Text after the last delimiter, or the whole tag if it has none.
pub fn tag_suffix(tag: &str) -> &str {
    match tag.rsplit_once(TAG_DELIMITER) {
        Some((_, suffix)) => suffix,
        None => tag,
    }
}

/// Suffix used for fallback matching, `None` if `tag` has no delimiter.
fn fallback_suffix(tag: &str) -> Option<&str> {
    tag.rsplit_once(TAG_DELIMITER).map(|(_, suffix)| suffix)
}

impl Brep {
    /// Face whose tag equals `tag`.
    pub fn face_by_tag(&self, tag: &str) -> Option<FaceKey> {
        self.faces
            .iter()
            .find(|(_, f)| f.tag == tag)
            .map(|(k, _)| k)
    }

    /// Coedge whose tag equals `tag`, reached through the edges' coedges.
    pub fn coedge_by_tag(&self, tag: &str) -> Option<CoedgeKey> {
        self.find_coedge(|t| t == tag)
    }

    /// Face whose tag suffix equals the suffix of `tag`.
    pub fn face_by_tag_suffix(&self, tag: &str) -> Option<FaceKey> {
        let suffix = fallback_suffix(tag)?;
        self.faces
            .iter()
            .find(|(_, f)| tag_suffix(&f.tag) == suffix)
            .map(|(k, _)| k)
    }

    /// Coedge whose tag suffix equals the suffix of `tag`.
    pub fn coedge_by_tag_suffix(&self, tag: &str) -> Option<CoedgeKey> {
        let suffix = fallback_suffix(tag)?;
        self.find_coedge(|t| tag_suffix(t) == suffix)
    }

    fn find_coedge(&self, mut pred: impl FnMut(&str) -> bool) -> Option<CoedgeKey> {
        self.edges
            .values()
            .flat_map(|e| e.coedges.iter().copied())
            .find(|&ck| self.coedges.get(ck).is_some_and(|c| pred(&c.tag)))
    }
}

/// Tag lookup across several Breps.
#[derive(Debug, Clone, Copy)]
pub struct TagLookup<'a> {
    breps: &'a [Brep],
}

impl<'a> TagLookup<'a> {
    pub fn new(breps: &'a [Brep]) -> Self {
        Self { breps }
    }

    pub fn breps(&self) -> &'a [Brep] {
        self.breps
    }

    pub fn exact_face(&self, tag: &str) -> Option<FaceRef> {
        self.breps
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.face_by_tag(tag).map(|f| FaceRef::new(i, f)))
    }

    /// Like [`exact_face`](Self::exact_face), but the last Brep holding the
    /// tag wins.
    pub fn last_exact_face(&self, tag: &str) -> Option<FaceRef> {
        self.breps
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, b)| b.face_by_tag(tag).map(|f| FaceRef::new(i, f)))
    }

    pub fn suffix_fallback_face(&self, tag: &str) -> Option<FaceRef> {
        self.breps
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.face_by_tag_suffix(tag).map(|f| FaceRef::new(i, f)))
    }

    pub fn exact_coedge(&self, tag: &str) -> Option<CoedgeRef> {
        self.breps
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.coedge_by_tag(tag).map(|c| CoedgeRef::new(i, c)))
    }

    pub fn suffix_fallback_coedge(&self, tag: &str) -> Option<CoedgeRef> {
        self.breps
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.coedge_by_tag_suffix(tag).map(|c| CoedgeRef::new(i, c)))
    }

    /// Exact match across every Brep, then the suffix fallback.
    pub fn face(&self, tag: &str) -> Result<FaceRef> {
        if let Some(found) = self.exact_face(tag) {
            return Ok(found);
        }
        let found = self
            .suffix_fallback_face(tag)
            .ok_or_else(|| Error::NotFound(format!("face '{}'", tag)))?;
        debug!(tag, brep = found.brep, "face resolved by tag suffix");
        Ok(found)
    }

    /// Exact match across every Brep, then the suffix fallback.
    pub fn coedge(&self, tag: &str) -> Result<CoedgeRef> {
        if let Some(found) = self.exact_coedge(tag) {
            return Ok(found);
        }
        let found = self
            .suffix_fallback_coedge(tag)
            .ok_or_else(|| Error::NotFound(format!("coedge '{}'", tag)))?;
        debug!(tag, brep = found.brep, "coedge resolved by tag suffix");
        Ok(found)
    }
}
