/// Property to column correspondences recovered from the base result map.
///
/// Entries keep the position of their first appearance; a repeated property
/// takes the column seen last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyColumnMap {
    entries: Vec<(String, String)>,
}

impl PropertyColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: impl Into<String>, column: impl Into<String>) {
        let property = property.into();
        let column = column.into();

        match self.entries.iter_mut().find(|(key, _)| *key == property) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((property, column)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, column)| column.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(property, column)| (property.as_str(), column.as_str()))
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for PropertyColumnMap {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (property, column) in iter {
            map.insert(property, column);
        }
        map
    }
}
