//! Output stream mapping

use std::collections::HashMap;

use crate::domain::model::{SourceId, StreamRef};

/// Maps each selected `(source, stream)` to its output index.
///
/// Output indices are assigned in selection order, so they are contiguous
/// from zero and a stream never maps to two outputs.
#[derive(Debug, Clone, Default)]
pub struct OutputStreamMap {
    order: Vec<StreamRef>,
    lookup: HashMap<StreamRef, usize>,
}

impl OutputStreamMap {
    /// Build the map from streams in output order. Duplicates keep their first slot.
    pub fn new(ordered: &[StreamRef]) -> Self {
        let mut map = Self::default();
        for &stream in ordered {
            if !map.lookup.contains_key(&stream) {
                map.lookup.insert(stream, map.order.len());
                map.order.push(stream);
            }
        }
        map
    }

    /// Output index for a stream of `source`, or `None` if it was not selected
    pub fn output_index(&self, source: SourceId, index: usize) -> Option<usize> {
        self.lookup.get(&StreamRef { source, index }).copied()
    }

    /// Selected streams in output order
    pub fn streams(&self) -> &[StreamRef] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_contiguous_and_bijective() {
        let ordered = vec![
            StreamRef::primary(0),
            StreamRef::primary(2),
            StreamRef::secondary(0),
            StreamRef::primary(5),
            StreamRef::secondary(3),
        ];
        let map = OutputStreamMap::new(&ordered);

        assert_eq!(map.len(), ordered.len());
        let mut outputs: Vec<usize> = ordered
            .iter()
            .map(|s| map.output_index(s.source, s.index).unwrap_or(usize::MAX))
            .collect();
        outputs.sort_unstable();
        assert_eq!(outputs, (0..ordered.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sources_are_distinct() {
        let map = OutputStreamMap::new(&[StreamRef::primary(0), StreamRef::secondary(0)]);
        assert_eq!(map.output_index(SourceId::Primary, 0), Some(0));
        assert_eq!(map.output_index(SourceId::Secondary, 0), Some(1));
        assert_eq!(map.output_index(SourceId::Primary, 1), None);
    }

    #[test]
    fn test_duplicates_collapse() {
        let map = OutputStreamMap::new(&[StreamRef::primary(1), StreamRef::primary(1), StreamRef::primary(4)]);
        assert_eq!(map.streams(), &[StreamRef::primary(1), StreamRef::primary(4)]);
        assert_eq!(map.output_index(SourceId::Primary, 4), Some(1));
    }
}
