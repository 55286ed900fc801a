//! The boundary type shared with the surrounding archive code: an ordered
//! group of named lumps.

/// An ordered collection of named lumps.  Lump names are not unique inside
/// a wad directory, so this is a list rather than a map; lookup returns the
/// first entry with a matching name.
#[derive(Clone, Debug, Default)]
pub struct NameGroup {
    entries: Vec<(String, Vec<u8>)>,
}

impl NameGroup {
    pub fn new() -> Self {
        NameGroup { entries: Vec::new() }
    }

    /// Appends a lump.  An existing entry with the same name is left alone;
    /// it just shadows the new one for lookup.
    pub fn push<S: Into<String>>(&mut self, name: S, data: Vec<u8>) {
        self.entries.push((name.into(), data));
    }

    /// The first lump with this name, if any.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|&&(ref n, _)| n == name)
            .map(|&(_, ref data)| data.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|&(ref name, ref data)| (name.as_str(), data.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
