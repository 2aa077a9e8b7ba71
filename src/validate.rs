use bitvec::prelude::*;

use smallvec::SmallVec;

use crate::{stats::INLINE_STACK_SIZE, Bounded, Bvh, NodeKind, ValidationError};

impl<T> Bvh<T>
where
    T: Bounded,
{
    /// Check the structure a consumer of the node and primitive arrays relies on.
    ///
    /// Every node is reached exactly once from the root, child indices and leaf
    /// ranges are in bounds, leaves partition the primitives without gaps or
    /// overlaps, and every box contains what is below it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let node_count = self.nodes.len();
        let prim_count = self.primitives.len();

        if node_count == 0 {
            return match prim_count {
                0 => Ok(()),
                _ => Err(ValidationError::PrimitiveUncovered { index: 0 }),
            };
        }

        let mut visited = bitvec![0; node_count];
        let mut covered = bitvec![0; prim_count];

        let mut stack: SmallVec<[usize; INLINE_STACK_SIZE]> = SmallVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            if visited.replace(node_id, true) {
                return Err(ValidationError::NodeRevisited { node: node_id });
            }

            let node = &self.nodes[node_id];
            match node.kind {
                NodeKind::Leaf { start, count } => {
                    let end = start + count;
                    if end > prim_count {
                        return Err(ValidationError::LeafOutOfBounds {
                            node: node_id,
                            start,
                            end,
                            count: prim_count,
                        });
                    }

                    for index in start..end {
                        if covered.replace(index, true) {
                            return Err(ValidationError::PrimitiveOverlap { index });
                        }
                        if !node.aabb.contains(&self.primitives[index].bounds()) {
                            return Err(ValidationError::BoundsNotContained {
                                node: node_id,
                                what: format!("primitive {index}"),
                            });
                        }
                    }
                }
                NodeKind::Interior { left, right } => {
                    for child in [left, right] {
                        if child >= node_count {
                            return Err(ValidationError::ChildOutOfBounds {
                                node: node_id,
                                child,
                                count: node_count,
                            });
                        }
                        if !node.aabb.contains(&self.nodes[child].aabb) {
                            return Err(ValidationError::BoundsNotContained {
                                node: node_id,
                                what: format!("child node {child}"),
                            });
                        }
                    }
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        if let Some(node) = visited.first_zero() {
            return Err(ValidationError::UnreachableNode { node });
        }
        if let Some(index) = covered.first_zero() {
            return Err(ValidationError::PrimitiveUncovered { index });
        }

        Ok(())
    }
}
