use std::collections::BTreeSet;

use cask_codec::{EntityReader, EntityWriter, Value};
use cask_types::{
    validation_error, Bounded, DirectedGraph, Element, Error, GraphFlags, Result, ValidationFlags,
    Validator,
};

use crate::Managed;

/// Serialized as the `Roots` vector and the `Edges` vector of interleaved
/// pairs `[from_0, to_0, from_1, to_1, …]`, both in set order.
impl<T> Managed for DirectedGraph<T>
where
    T: Element + Bounded + Ord,
    Vec<T>: Value,
{
    fn clear(&mut self) {
        Self::clear(self);
    }

    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        let roots: Vec<T> = self.roots().iter().cloned().collect();
        writer.write("Roots", &roots)?;

        let mut pairs = Vec::with_capacity(self.edges().len() * 2);
        for (from, to) in self.edges() {
            pairs.push(from.clone());
            pairs.push(to.clone());
        }
        writer.write("Edges", &pairs)?;
        Ok(())
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        Self::clear(self);

        let roots: Vec<T> = reader.read("Roots")?;
        for root in roots {
            self.add_root(root);
        }

        let pairs: Vec<T> = reader.read("Edges")?;
        if pairs.len() % 2 != 0 {
            log::error!(
                "the Edges array of a directed graph has an odd number of values: {}",
                pairs.len()
            );
            return Err(Error::Corrupted);
        }
        let mut pairs = pairs.into_iter();
        while let (Some(from), Some(to)) = (pairs.next(), pairs.next()) {
            self.insert_edge(from, to);
        }
        Ok(())
    }

    fn validate(&self, validator: &mut Validator) -> Result<()> {
        let flags = self.flags();

        // nodes with any incoming edge
        let mut downstream: BTreeSet<&T> = BTreeSet::new();
        for (_, to) in self.edges() {
            downstream.insert(to);
        }

        // the rest of the nodes appearing in edges have no incoming edge,
        // so they are the computed roots
        let mut computed_roots: BTreeSet<&T> = BTreeSet::new();
        for (from, _) in self.edges() {
            if !downstream.contains(from) {
                computed_roots.insert(from);
            }
        }

        if flags.contains(GraphFlags::SINGLE_ROOT) && computed_roots.len() != 1 {
            validation_error!(
                validator,
                ValidationFlags::INVALID_COUNT,
                "the graph has {} roots but is required to have exactly one",
                computed_roots.len()
            );
        }

        if flags.contains(GraphFlags::ROOTED) {
            if flags.contains(GraphFlags::SINGLE_ROOT) && self.roots().len() != 1 {
                validation_error!(
                    validator,
                    ValidationFlags::INVALID_COUNT,
                    "the graph is single rooted, but the Roots set has {} nodes",
                    self.roots().len()
                );
            }

            // nothing in the Roots set may have incoming edges
            for node in self.roots() {
                if downstream.contains(node) {
                    validation_error!(
                        validator,
                        ValidationFlags::INVALID_OBJECT,
                        "node {node:?} in the Roots set has incoming edges"
                    );
                }
            }

            // every computed root must be listed in the Roots set
            for &node in &computed_roots {
                if !self.roots().contains(node) {
                    validation_error!(
                        validator,
                        ValidationFlags::MISSING_OBJECT,
                        "node {node:?} has no incoming edges but is not in the Roots set"
                    );
                }
            }

            self.validate_reachability(&downstream, validator);
        }

        if flags.contains(GraphFlags::ACYCLIC) {
            self.validate_no_cycles(validator);
        }

        Ok(())
    }
}

trait GraphChecks<T> {
    fn validate_reachability(&self, downstream: &BTreeSet<&T>, validator: &mut Validator);
    fn validate_no_cycles(&self, validator: &mut Validator);
}

impl<T> GraphChecks<T> for DirectedGraph<T>
where
    T: Element + Bounded + Ord,
{
    /// Breadth-first search from the Roots set; every downstream node must
    /// be reached.
    fn validate_reachability(&self, downstream: &BTreeSet<&T>, validator: &mut Validator) {
        let mut queue: Vec<&T> = self.roots().iter().collect();
        let mut reached: BTreeSet<&T> = BTreeSet::new();

        let mut head = 0;
        while head < queue.len() {
            let current = queue[head];
            head += 1;
            if !reached.insert(current) {
                continue;
            }
            for child in self.successors(current) {
                if !reached.contains(child) {
                    queue.push(child);
                }
            }
        }

        for node in downstream {
            if !reached.contains(node) {
                validation_error!(
                    validator,
                    ValidationFlags::INVALID_SETUP,
                    "node {node:?} cannot be reached from the Roots set"
                );
            }
        }
    }

    /// Depth-first search with gray/black marking. Only the first cycle
    /// found is reported.
    fn validate_no_cycles(&self, validator: &mut Validator) {
        let mut stack: Vec<&T> = Vec::new();
        let mut on_stack: BTreeSet<&T> = BTreeSet::new();
        let mut checked: BTreeSet<&T> = BTreeSet::new();

        for (node, _) in self.edges() {
            if checked.contains(node) {
                continue;
            }
            stack.push(node);

            while let Some(&current) = stack.last() {
                if checked.insert(current) {
                    on_stack.insert(current);
                } else {
                    on_stack.remove(current);
                    stack.pop();
                }

                for child in self.successors(current) {
                    if !checked.contains(child) {
                        stack.push(child);
                    } else if on_stack.contains(child) {
                        validation_error!(
                            validator,
                            ValidationFlags::INVALID_SETUP,
                            "node {child:?} is part of a cycle, but the graph is flagged acyclic"
                        );
                        return;
                    }
                }
            }
        }
    }
}
