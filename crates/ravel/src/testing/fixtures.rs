//! Canned grammars with hand-derived automata and edge-set tables.
//!
//! Each fixture documents its grammar and the vertex layout of its grammar
//! graph. The forward automata are regular over-approximations, so some
//! fixtures accept traces whose nesting a resolver later rejects; that is
//! the behavior under test.

use super::DataFileBuilder;
use crate::datafile::{DataFile, Vertex, VertexKind};

/// `S -> 'a'`.
///
/// Vertices: 1 `start S`, 2 `final`, 3/4 plain around the char edge.
#[must_use]
pub fn single_a() -> DataFile {
    DataFileBuilder::new()
        .symbol('a', 1)
        .forward_state(&[(1, 2)], false)
        .forward_state(&[], true)
        .backward_state(&[(2, 2)], false)
        .backward_state(&[], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(4, 2)], &[])
        .edge_set(&[(1, 3)], &[(3, 4)])
        .roots(1, 2)
        .build()
        .expect("single_a tables are valid")
}

/// `S -> 'a'*`.
///
/// Vertices: 1 `start S`, 2 `final`, 3 the loop hub with a char self-edge.
#[must_use]
pub fn repeat_a() -> DataFile {
    DataFileBuilder::new()
        .symbol('a', 1)
        .forward_state(&[(1, 2)], true)
        .forward_state(&[(1, 2)], true)
        .backward_state(&[(2, 2)], false)
        .backward_state(&[(2, 2)], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain())
        .edge_set(&[(1, 3), (3, 2)], &[])
        .edge_set(&[(1, 3)], &[(3, 3)])
        .roots(1, 2)
        .build()
        .expect("repeat_a tables are valid")
}

/// Builder for [`balanced_parens`], exposed for loader round-trip tests.
#[must_use]
pub fn balanced_parens_builder() -> DataFileBuilder {
    DataFileBuilder::new()
        .symbol('(', 1)
        .symbol(')', 2)
        .forward_state(&[(1, 2), (2, 3)], true)
        .forward_state(&[(1, 2), (2, 3)], true)
        .forward_state(&[(2, 3)], true)
        .backward_state(&[(2, 3), (3, 2)], false)
        .backward_state(&[(2, 3), (3, 2)], false)
        .backward_state(&[(2, 3)], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(4, 1), (1, 2), (6, 2)], &[])
        .edge_set(&[(4, 1), (1, 2), (2, 5), (6, 2)], &[(5, 6)])
        .edge_set(&[(1, 3), (4, 1)], &[(3, 4)])
        .roots(1, 2)
}

/// `S -> '(' S ')' | ε`: fully nested paren chains.
///
/// Vertices: 1 `start S`, 2 `final`; 3/4 bracket the `(` char edge, 5/6
/// bracket the `)` char edge; 4 re-enters `S`, 1 -> 2 is the ε branch.
/// The forward automaton over-approximates, so inputs like `((` survive the
/// scan and are only rejected by the resolvers.
#[must_use]
pub fn balanced_parens() -> DataFile {
    balanced_parens_builder()
        .build()
        .expect("balanced_parens tables are valid")
}

/// `S -> T*`, `T -> '(' S ')'`: every balanced paren string, with one `T`
/// node per pair and one `S` node per (possibly empty) sequence.
///
/// Vertices: 1 `start S`, 2 `final`, 3 the sequence hub; 4 `start T`,
/// 5 `final` of `T`; 6/7 bracket the `(` char edge, 8/9 the `)` char edge.
/// After `(` the body re-enters `S` at 1; after `S` closes at 2 the path
/// runs through 8 to consume `)`. The forward automaton accepts any paren
/// string, so balance is enforced entirely by the resolvers.
#[must_use]
pub fn dyck() -> DataFile {
    DataFileBuilder::new()
        .symbol('(', 1)
        .symbol(')', 2)
        .forward_state(&[(1, 2), (2, 3)], true)
        .forward_state(&[(1, 2), (2, 3)], true)
        .forward_state(&[(1, 2), (2, 3)], true)
        .backward_state(&[(2, 3), (3, 2)], false)
        .backward_state(&[(2, 3), (3, 2)], false)
        .backward_state(&[(2, 3), (3, 2)], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain())
        .vertex(Vertex::start("T", 5))
        .vertex(Vertex::fin(4))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(1, 3), (3, 2), (7, 1), (9, 5), (5, 3)], &[])
        .edge_set(&[(1, 3), (3, 2), (7, 1), (2, 8), (9, 5), (5, 3)], &[(8, 9)])
        .edge_set(&[(1, 3), (3, 4), (4, 6), (7, 1), (9, 5), (5, 3)], &[(6, 7)])
        .roots(1, 2)
        .build()
        .expect("dyck tables are valid")
}

/// `S -> A | B`, `A -> 'a'`, `B -> 'a'`: one input, two parses.
///
/// Branch `A` (vertices 3/4, interior 7/8) carries sort key 2; branch `B`
/// (vertices 5/6, interior 9/10) carries sort key 1 and wins the tie-break.
#[must_use]
pub fn two_alternatives() -> DataFile {
    two_alternatives_with(|v| v)
}

/// [`two_alternatives`] with identity `stack_vertex` projections on the
/// pushed vertices.
#[must_use]
pub fn projected_alternatives() -> DataFile {
    two_alternatives_with(|vertex| {
        if vertex.kind == Some(VertexKind::Start) {
            let own = match vertex.text.as_deref() {
                Some("S") => 1,
                Some("A") => 3,
                _ => 5,
            };
            vertex.with_stack_vertex(own)
        } else {
            vertex
        }
    })
}

fn two_alternatives_with(decorate: impl Fn(Vertex) -> Vertex) -> DataFile {
    DataFileBuilder::new()
        .symbol('a', 1)
        .forward_state(&[(1, 2)], false)
        .forward_state(&[], true)
        .backward_state(&[(2, 2)], false)
        .backward_state(&[], false)
        .vertex(decorate(Vertex::start("S", 2)))
        .vertex(Vertex::fin(1))
        .vertex(decorate(Vertex::start("A", 4).with_sort_key(2)))
        .vertex(Vertex::fin(3))
        .vertex(decorate(Vertex::start("B", 6).with_sort_key(1)))
        .vertex(Vertex::fin(5))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(8, 4), (10, 6), (4, 2), (6, 2)], &[])
        .edge_set(&[(1, 3), (1, 5), (3, 7), (5, 9)], &[(7, 8), (9, 10)])
        .roots(1, 2)
        .build()
        .expect("two_alternatives tables are valid")
}

/// `S -> 'a' 'b'` with a decoy guard bracket.
///
/// Two paths cover the same input: one through an `if`/`fi` pair (vertices
/// 3/4, interior 5-8, tried first by sort key) and a plain bypass (vertices
/// 9-12). Completing the bracket certifies the guarded pattern matched, so
/// only the bypass yields a tree.
#[must_use]
pub fn guarded_choice() -> DataFile {
    DataFileBuilder::new()
        .symbol('a', 1)
        .symbol('b', 2)
        .forward_state(&[(1, 2)], false)
        .forward_state(&[(2, 3)], false)
        .forward_state(&[], true)
        .backward_state(&[(3, 2)], false)
        .backward_state(&[(2, 3)], false)
        .backward_state(&[], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::guard_if(4))
        .vertex(Vertex::guard_fi(3))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain().with_sort_key(1))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(8, 4), (4, 2), (12, 2)], &[])
        .edge_set(&[(6, 7), (10, 11)], &[(7, 8), (11, 12)])
        .edge_set(&[(1, 3), (3, 5), (1, 9)], &[(5, 6), (9, 10)])
        .roots(1, 2)
        .build()
        .expect("guarded_choice tables are valid")
}

/// [`guarded_choice`] without the bypass: every path completes the guard
/// bracket, so the scan accepts `ab` but no resolver yields a tree.
#[must_use]
pub fn guard_only() -> DataFile {
    DataFileBuilder::new()
        .symbol('a', 1)
        .symbol('b', 2)
        .forward_state(&[(1, 2)], false)
        .forward_state(&[(2, 3)], false)
        .forward_state(&[], true)
        .backward_state(&[(3, 2)], false)
        .backward_state(&[(2, 3)], false)
        .backward_state(&[], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::guard_if(4))
        .vertex(Vertex::guard_fi(3))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(8, 4), (4, 2)], &[])
        .edge_set(&[(6, 7)], &[(7, 8)])
        .edge_set(&[(1, 3), (3, 5)], &[(5, 6)])
        .roots(1, 2)
        .build()
        .expect("guard_only tables are valid")
}

/// Empty-accepting grammar with a null cycle `3 -> 4 -> 3` and an exit.
///
/// Vertex 3 carries sort key 1, so the exit through the `final` at 2 sorts
/// ahead of re-entering the cycle.
#[must_use]
pub fn null_cycle() -> DataFile {
    DataFileBuilder::new()
        .forward_state(&[], true)
        .backward_state(&[], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain().with_sort_key(1))
        .vertex(Vertex::plain())
        .edge_set(&[(1, 3), (3, 4), (4, 3), (4, 2)], &[])
        .roots(1, 2)
        .build()
        .expect("null_cycle tables are valid")
}

/// A null cycle with no exit: the backtracking search spins until its step
/// budget runs out, while the parallel simulation reaches a fixpoint and
/// rejects.
#[must_use]
pub fn dead_null_cycle() -> DataFile {
    DataFileBuilder::new()
        .forward_state(&[], true)
        .backward_state(&[], false)
        .vertex(Vertex::start("S", 2))
        .vertex(Vertex::fin(1))
        .vertex(Vertex::plain())
        .vertex(Vertex::plain())
        .edge_set(&[(1, 3), (3, 4), (4, 3)], &[])
        .roots(1, 2)
        .build()
        .expect("dead_null_cycle tables are valid")
}

/// A `start` vertex whose `with` partner is absent: resolvers must discard
/// rather than guess a pairing.
#[must_use]
pub fn missing_with() -> DataFile {
    DataFileBuilder::new()
        .forward_state(&[], true)
        .backward_state(&[], false)
        .vertex(Vertex {
            kind: Some(VertexKind::Start),
            text: Some("S".into()),
            with: None,
            sort_key: 0,
            stack_vertex: None,
        })
        .vertex(Vertex::fin(1))
        .edge_set(&[(1, 2)], &[])
        .roots(1, 2)
        .build()
        .expect("missing_with tables are valid")
}
