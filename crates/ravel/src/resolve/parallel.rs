//! Breadth-wise pushdown simulation over a shared stack graph.
//!
//! Processes every live alternative at once, column by column. All possible
//! stack configurations are represented by one [`StackGraph`]: pushing at a
//! `start`/`if` vertex adds an edge from the pushed value to each successor,
//! popping at a `final`/`fi` vertex splices the grandparent predecessors
//! through to the successors, and plain vertices copy their predecessor set
//! forward. Null cycles are handled by re-enqueueing a node whenever it (or a
//! pushed value it pops through) gains a new edge; edge additions are
//! monotone, so the per-column fixpoint terminates.
//!
//! The input matches when the stack graph holds a guard-clean edge from the
//! origin push to the final node and the final node was reached. Tree
//! extraction then walks the parse graph with a concrete stack, pruning every
//! move through the stack graph as an oracle.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use super::{ResolveMetrics, ResolveOutcome, SharedStack, StackGraph};
use crate::datafile::{DataFile, VertexId, VertexKind};
use crate::error::ParseError;
use crate::graph::Node;
use crate::tree::ParseTree;
use crate::scan::EdgeStream;
use crate::tree::{tree_from_events, TreeEvent};

/// Tuning knobs for the parallel resolver.
#[derive(Debug, Clone, Copy)]
pub struct ParallelConfig {
    /// Collapse push identities through `stack_vertex` before insertion into
    /// the stack graph. Acceptance is unchanged; one concrete witness per
    /// representative is kept for partner matching and extraction.
    pub project_stack_vertices: bool,
    /// Record whether extraction saw more than one viable successor anywhere.
    pub record_ambiguity: bool,
    /// Step budget for tree extraction.
    pub max_steps: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            project_stack_vertices: false,
            record_ambiguity: true,
            max_steps: 1_000_000,
        }
    }
}

/// Resolves an edge stream by simulating a non-deterministic pushdown
/// transducer with a shared stack graph.
#[derive(Debug, Clone, Copy)]
pub struct ParallelResolver<'a> {
    data: &'a DataFile,
    config: ParallelConfig,
}

struct Simulation {
    graph: StackGraph,
    /// Push identity of the origin node.
    origin: Node,
    final_node: Node,
    final_reached: bool,
    /// Projected push identity -> one concrete vertex carrying it.
    witness: HashMap<u64, VertexId, ahash::RandomState>,
    metrics: ResolveMetrics,
}

impl Simulation {
    fn accepted(&self) -> bool {
        self.final_reached && self.graph.has_valid_edge(self.origin, self.final_node)
    }

    fn witness_vertex(&self, pushed: Node) -> VertexId {
        self.witness
            .get(&pushed.key())
            .copied()
            .unwrap_or(pushed.vertex)
    }
}

impl<'a> ParallelResolver<'a> {
    #[must_use]
    pub fn new(data: &'a DataFile) -> Self {
        Self {
            data,
            config: ParallelConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(data: &'a DataFile, config: ParallelConfig) -> Self {
        Self { data, config }
    }

    /// Acceptance test only: does any well-nested, guard-clean path exist?
    #[must_use]
    pub fn accepts(&self, stream: &EdgeStream) -> bool {
        self.simulate(stream).accepted()
    }

    /// Acceptance test plus extraction of the first witness tree.
    ///
    /// # Errors
    ///
    /// [`ParseError::NoParseTree`] when the simulation rejects;
    /// [`ParseError::LimitExceeded`] when extraction runs out of budget.
    pub fn resolve(&self, stream: &EdgeStream) -> Result<ResolveOutcome, ParseError> {
        let sim = self.simulate(stream);
        if !sim.accepted() {
            return Err(ParseError::NoParseTree);
        }
        let mut metrics = sim.metrics;
        let (tree, ambiguous) = self.extract(stream, &sim, &mut metrics)?;
        Ok(ResolveOutcome {
            tree,
            ambiguous,
            metrics,
        })
    }

    fn push_identity(&self, node: Node) -> Node {
        if self.config.project_stack_vertices {
            Node::new(node.column, self.data.project(node.vertex))
        } else {
            node
        }
    }

    fn simulate(&self, stream: &EdgeStream) -> Simulation {
        let data = self.data;
        let last_column = u32::try_from(stream.len().saturating_sub(1)).unwrap_or(u32::MAX);
        let origin_node = Node::new(0, data.start_vertex());
        let mut sim = Simulation {
            graph: StackGraph::new(),
            origin: self.push_identity(origin_node),
            final_node: Node::new(last_column, data.final_vertex()),
            final_reached: false,
            witness: HashMap::with_hasher(ahash::RandomState::new()),
            metrics: ResolveMetrics::default(),
        };
        if stream.is_empty() {
            return sim;
        }

        let mut heads: Vec<Node> = vec![origin_node];
        for column in 0..stream.len() {
            let col = u32::try_from(column).unwrap_or(u32::MAX);
            let edge_set = stream.get(column);

            // Column-local successor map: vertex -> (target node, crosses).
            let mut out: HashMap<VertexId, SmallVec<[(Node, bool); 4]>, ahash::RandomState> =
                HashMap::with_hasher(ahash::RandomState::new());
            for &(from, to) in data.null_edges(edge_set) {
                out.entry(from).or_default().push((Node::new(col, to), false));
            }
            for &(from, to) in data.char_edges(edge_set) {
                out.entry(from)
                    .or_default()
                    .push((Node::new(col + 1, to), true));
            }

            let mut queue: VecDeque<Node> = VecDeque::new();
            let mut queued: HashSet<u64, ahash::RandomState> =
                HashSet::with_hasher(ahash::RandomState::new());
            for head in heads.drain(..) {
                if queued.insert(head.key()) {
                    queue.push_back(head);
                }
            }
            let mut next_heads: Vec<Node> = Vec::new();
            let mut next_heads_seen: HashSet<u64, ahash::RandomState> =
                HashSet::with_hasher(ahash::RandomState::new());

            while let Some(node) = queue.pop_front() {
                queued.remove(&node.key());
                sim.metrics.steps += 1;
                if node == sim.final_node {
                    sim.final_reached = true;
                }

                let vertex = data.vertex(node.vertex);
                let empty: SmallVec<[(Node, bool); 4]> = SmallVec::new();
                let successors = out.get(&node.vertex).unwrap_or(&empty);

                match vertex.kind {
                    Some(VertexKind::Start | VertexKind::If) => {
                        // Unpaired brackets can never close; leave them dead.
                        if vertex.with.is_none() {
                            continue;
                        }
                        let pushed = self.push_identity(node);
                        sim.witness
                            .entry(pushed.key())
                            .or_insert(node.vertex);
                        for &(target, crosses) in successors {
                            self.connect(&mut sim, pushed, target, false, col, &mut queue, &mut queued);
                            if crosses && next_heads_seen.insert(target.key()) {
                                next_heads.push(target);
                            }
                        }
                    }
                    Some(kind @ (VertexKind::Final | VertexKind::Fi)) => {
                        let is_fi = kind == VertexKind::Fi;
                        let preds: SmallVec<[Node; 8]> = sim.graph.predecessors(node).collect();
                        for pushed in preds {
                            let witness = sim.witness_vertex(pushed);
                            if data.vertex(witness).with != Some(node.vertex) {
                                sim.graph.delete_edge(pushed, node);
                                sim.metrics.discards += 1;
                                continue;
                            }
                            let inner_failed =
                                sim.graph.guard_failed(pushed, node).unwrap_or(false);
                            let grandparents: SmallVec<[(Node, bool); 8]> = sim
                                .graph
                                .predecessors(pushed)
                                .map(|gp| {
                                    (gp, sim.graph.guard_failed(gp, pushed).unwrap_or(false))
                                })
                                .collect();
                            for &(target, crosses) in successors {
                                for &(grandparent, outer_failed) in &grandparents {
                                    let failed = is_fi || inner_failed || outer_failed;
                                    self.connect(
                                        &mut sim,
                                        grandparent,
                                        target,
                                        failed,
                                        col,
                                        &mut queue,
                                        &mut queued,
                                    );
                                    if crosses && next_heads_seen.insert(target.key()) {
                                        next_heads.push(target);
                                    }
                                }
                            }
                        }
                    }
                    None => {
                        let preds: SmallVec<[(Node, bool); 8]> = sim
                            .graph
                            .predecessors(node)
                            .map(|p| (p, sim.graph.guard_failed(p, node).unwrap_or(false)))
                            .collect();
                        for &(target, crosses) in successors {
                            for &(pred, failed) in &preds {
                                self.connect(
                                    &mut sim, pred, target, failed, col, &mut queue, &mut queued,
                                );
                                if crosses && next_heads_seen.insert(target.key()) {
                                    next_heads.push(target);
                                }
                            }
                        }
                    }
                }
            }

            heads = next_heads;
        }

        sim
    }

    /// Add an edge and schedule the consumers of the new information: the
    /// target itself and any node that might pop through the target.
    #[allow(clippy::too_many_arguments)]
    fn connect(
        &self,
        sim: &mut Simulation,
        from: Node,
        to: Node,
        guard_failed: bool,
        column: u32,
        queue: &mut VecDeque<Node>,
        queued: &mut HashSet<u64, ahash::RandomState>,
    ) {
        let result = sim.graph.add_edge(from, to, guard_failed);
        if !result.changed() {
            return;
        }
        sim.metrics.forks += 1;
        let mut revisit: SmallVec<[Node; 8]> = SmallVec::new();
        if to.column == column {
            revisit.push(to);
        }
        for consumer in sim.graph.successors(to) {
            if consumer.column == column {
                revisit.push(consumer);
            }
        }
        for node in revisit {
            if queued.insert(node.key()) {
                queue.push_back(node);
            }
        }
    }

    /// Walk the parse graph with a concrete stack, pruning through the stack
    /// graph: a move to `s` is viable only while the current top of stack is
    /// a guard-clean predecessor of `s`.
    fn extract(
        &self,
        stream: &EdgeStream,
        sim: &Simulation,
        metrics: &mut ResolveMetrics,
    ) -> Result<(ParseTree, bool), ParseError> {
        let data = self.data;
        let mut ambiguous = false;
        let mut steps = 0usize;

        #[derive(Clone)]
        struct Walker {
            offset: usize,
            vertex: VertexId,
            stack: SharedStack<Node>,
            output: SharedStack<TreeEvent>,
        }

        let mut frontier: Vec<Walker> = vec![Walker {
            offset: 0,
            vertex: data.start_vertex(),
            stack: SharedStack::new(),
            output: SharedStack::new(),
        }];

        'frontier: while let Some(mut walker) = frontier.pop() {
            loop {
                steps += 1;
                if steps > self.config.max_steps {
                    return Err(ParseError::LimitExceeded { steps });
                }

                let vertex_id = walker.vertex;
                let vertex = data.vertex(vertex_id);
                let here = Node::new(offset_u32(walker.offset), vertex_id);
                match vertex.kind {
                    Some(VertexKind::Start | VertexKind::If) => {
                        if vertex.with.is_none() {
                            continue 'frontier;
                        }
                        walker.stack.push(here);
                        metrics.max_stack_depth =
                            metrics.max_stack_depth.max(walker.stack.len());
                        if vertex.kind == Some(VertexKind::Start) {
                            walker.output.push(TreeEvent::Open {
                                name: vertex
                                    .text
                                    .clone()
                                    .unwrap_or_else(|| compact_str::format_compact!("{vertex_id}")),
                            });
                        }
                    }
                    Some(VertexKind::Final) => {
                        let matched = walker
                            .stack
                            .top()
                            .is_some_and(|n| data.vertex(n.vertex).with == Some(vertex_id));
                        if !matched {
                            continue 'frontier;
                        }
                        let opened = walker.stack.pop().expect("matched frame present");
                        walker.output.push(TreeEvent::Close {
                            start: opened.column,
                            end: offset_u32(walker.offset),
                        });
                    }
                    // Guard-clean witnesses never complete an if/fi bracket.
                    Some(VertexKind::Fi) => continue 'frontier,
                    None => {}
                }

                if vertex_id == data.final_vertex()
                    && walker.offset + 1 >= stream.len()
                    && walker.stack.is_empty()
                {
                    let events = walker.output.to_vec();
                    let tree = tree_from_events(&events).ok_or(ParseError::NoParseTree)?;
                    return Ok((tree, ambiguous));
                }

                let edge_set = stream.get(walker.offset);
                let mut successors: SmallVec<[(VertexId, bool); 8]> = SmallVec::new();
                for &(from, to) in data.null_edges(edge_set) {
                    if from == vertex_id {
                        successors.push((to, false));
                    }
                }
                for &(from, to) in data.char_edges(edge_set) {
                    if from == vertex_id {
                        successors.push((to, true));
                    }
                }
                successors.sort_by_key(|&(to, _)| data.vertex(to).sort_key);
                successors.retain(|&mut (to, crosses)| {
                    let target = Node::new(offset_u32(walker.offset + usize::from(crosses)), to);
                    match walker.stack.top() {
                        Some(&top) => sim
                            .graph
                            .has_valid_edge(self.push_identity(top), target),
                        None => true,
                    }
                });
                if successors.is_empty() {
                    continue 'frontier;
                }
                if self.config.record_ambiguity && successors.len() > 1 {
                    ambiguous = true;
                }

                for &(to, crosses) in successors[1..].iter().rev() {
                    frontier.push(Walker {
                        offset: walker.offset + usize::from(crosses),
                        vertex: to,
                        stack: walker.stack.clone(),
                        output: walker.output.clone(),
                    });
                }
                let (to, crosses) = successors[0];
                walker.offset += usize::from(crosses);
                walker.vertex = to;
            }
        }

        Err(ParseError::NoParseTree)
    }
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
