//! Nested argument trees and leaf paths.

use std::collections::BTreeMap;
use std::fmt;

use crate::array::Array;
use crate::dtype::EquivalenceKind;
use crate::scalar::Scalar;

/// A function argument: a scalar, a container of trees, or an array.
///
/// `Tuple` is fixed-length and positional; `List` is variable-length. The two
/// are distinct kinds and never compare equivalent to each other.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgTree {
    Scalar(Scalar),
    Tuple(Vec<ArgTree>),
    List(Vec<ArgTree>),
    Map(BTreeMap<String, ArgTree>),
    Array(Array),
}

/// Kind of a tree node, used to decide whether two nodes are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar(EquivalenceKind),
    Tuple,
    List,
    Map,
    Array,
}

impl ArgTree {
    /// An `F64` scalar leaf.
    pub fn real(value: f64) -> Self {
        ArgTree::Scalar(Scalar::f64(value))
    }

    /// A `C128` scalar leaf.
    pub fn complex(re: f64, im: f64) -> Self {
        ArgTree::Scalar(Scalar::c128(re, im))
    }

    pub fn tuple(items: Vec<ArgTree>) -> Self {
        ArgTree::Tuple(items)
    }

    pub fn list(items: Vec<ArgTree>) -> Self {
        ArgTree::List(items)
    }

    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ArgTree)>,
    {
        ArgTree::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ArgTree::Scalar(s) => NodeKind::Scalar(s.kind()),
            ArgTree::Tuple(_) => NodeKind::Tuple,
            ArgTree::List(_) => NodeKind::List,
            ArgTree::Map(_) => NodeKind::Map,
            ArgTree::Array(_) => NodeKind::Array,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            ArgTree::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Every scalar leaf, in deterministic order: sequences by position, maps
    /// by key, arrays row-major.
    pub fn leaves(&self) -> Vec<Scalar> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            ArgTree::Scalar(_) => 1,
            ArgTree::Tuple(items) | ArgTree::List(items) => {
                items.iter().map(Self::num_leaves).sum()
            }
            ArgTree::Map(entries) => entries.values().map(Self::num_leaves).sum(),
            ArgTree::Array(a) => a.numel(),
        }
    }

    fn collect_leaves(&self, out: &mut Vec<Scalar>) {
        match self {
            ArgTree::Scalar(s) => out.push(*s),
            ArgTree::Tuple(items) | ArgTree::List(items) => {
                items.iter().for_each(|item| item.collect_leaves(out))
            }
            ArgTree::Map(entries) => entries.values().for_each(|v| v.collect_leaves(out)),
            ArgTree::Array(a) => out.extend(a.iter()),
        }
    }

    /// Apply `op` to every leaf, keeping the structure.
    ///
    /// Array results are stored at the full-width kind of the source
    /// array's family.
    pub fn map_scalars<F>(&self, op: &mut F) -> ArgTree
    where
        F: FnMut(Scalar) -> Scalar,
    {
        match self {
            ArgTree::Scalar(s) => ArgTree::Scalar(op(*s)),
            ArgTree::Tuple(items) => {
                ArgTree::Tuple(items.iter().map(|t| t.map_scalars(&mut *op)).collect())
            }
            ArgTree::List(items) => {
                ArgTree::List(items.iter().map(|t| t.map_scalars(&mut *op)).collect())
            }
            ArgTree::Map(entries) => ArgTree::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.map_scalars(&mut *op)))
                    .collect(),
            ),
            ArgTree::Array(a) => ArgTree::Array(a.map(a.dtype().promoted(), |s| op(s).value())),
        }
    }

    /// A deep copy of this container with exactly one child replaced.
    ///
    /// For arrays the segment is a coordinate and `value` must be a scalar,
    /// which is rounded to the array's dtype.
    ///
    /// # Panics
    /// Panics if `segment` does not address an existing child of this node.
    pub fn with_child(&self, segment: &PathSegment, value: ArgTree) -> ArgTree {
        match (self, segment) {
            (ArgTree::Tuple(items), PathSegment::Index(i)) => {
                ArgTree::Tuple(replace_item(items, *i, value))
            }
            (ArgTree::List(items), PathSegment::Index(i)) => {
                ArgTree::List(replace_item(items, *i, value))
            }
            (ArgTree::Map(entries), PathSegment::Key(k)) if entries.contains_key(k) => {
                let mut copy = entries.clone();
                copy.insert(k.clone(), value);
                ArgTree::Map(copy)
            }
            (ArgTree::Array(a), PathSegment::Coord(c)) => match value {
                ArgTree::Scalar(s) => ArgTree::Array(a.with_element(c, s)),
                other => panic!("array element must be a scalar, got {}", other.kind()),
            },
            (node, segment) => panic!("{:?} is not a child of a {} node", segment, node.kind()),
        }
    }

    /// Combine two trees of identical structure leaf by leaf.
    ///
    /// Returns `None` when kinds, lengths, keys or array shapes differ.
    pub fn zip_map<F>(&self, other: &ArgTree, op: &mut F) -> Option<ArgTree>
    where
        F: FnMut(Scalar, Scalar) -> Scalar,
    {
        match (self, other) {
            (ArgTree::Scalar(a), ArgTree::Scalar(b)) => Some(ArgTree::Scalar(op(*a, *b))),
            (ArgTree::Tuple(a), ArgTree::Tuple(b)) => zip_items(a, b, op).map(ArgTree::Tuple),
            (ArgTree::List(a), ArgTree::List(b)) => zip_items(a, b, op).map(ArgTree::List),
            (ArgTree::Map(a), ArgTree::Map(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                let mut out = BTreeMap::new();
                for (k, va) in a {
                    let vb = b.get(k)?;
                    out.insert(k.clone(), va.zip_map(vb, &mut *op)?);
                }
                Some(ArgTree::Map(out))
            }
            (ArgTree::Array(a), ArgTree::Array(b)) => a
                .zip_with(b, a.dtype().promoted(), |x, y| op(x, y).value())
                .map(ArgTree::Array),
            _ => None,
        }
    }
}

fn replace_item(items: &[ArgTree], index: usize, value: ArgTree) -> Vec<ArgTree> {
    assert!(index < items.len(), "index {} out of range for length {}", index, items.len());
    let mut copy = items.to_vec();
    copy[index] = value;
    copy
}

fn zip_items<F>(a: &[ArgTree], b: &[ArgTree], op: &mut F) -> Option<Vec<ArgTree>>
where
    F: FnMut(Scalar, Scalar) -> Scalar,
{
    if a.len() != b.len() {
        return None;
    }
    a.iter().zip(b).map(|(x, y)| x.zip_map(y, &mut *op)).collect()
}

impl fmt::Display for ArgTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgTree::Scalar(s) => write!(f, "{}", s),
            ArgTree::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            ArgTree::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            ArgTree::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            ArgTree::Array(a) => write!(f, "{}", a),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[ArgTree]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Scalar(kind) => write!(f, "scalar<{}>", kind),
            NodeKind::Tuple => f.write_str("tuple"),
            NodeKind::List => f.write_str("list"),
            NodeKind::Map => f.write_str("map"),
            NodeKind::Array => f.write_str("array"),
        }
    }
}

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Position in a tuple or list.
    Index(usize),
    /// Key in a map.
    Key(String),
    /// Coordinate in an array.
    Coord(Vec<usize>),
}

/// Route from the root of a tree to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeafPath(Vec<PathSegment>);

impl LeafPath {
    pub fn root() -> Self {
        LeafPath(Vec::new())
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        LeafPath(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Index(i) => write!(f, "[{}]", i)?,
                PathSegment::Key(k) => write!(f, "[{:?}]", k)?,
                PathSegment::Coord(c) => {
                    write!(f, "[")?;
                    for (i, x) in c.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", x)?;
                    }
                    write!(f, "]")?;
                }
            }
        }
        Ok(())
    }
}
