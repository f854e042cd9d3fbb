//! Strongly connected components of a directed graph.

use bit_vec::BitVec;

/// Calculate the strongly connected components of the graph given as
/// adjacency lists over the nodes `0..edges.len()`.
///
/// The components are returned in reverse topological order of the
/// condensation: every edge leaving a component points into a component that
/// appears before it. The nodes of each component are sorted.
pub fn strongly_connected_components(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let len = edges.len();
    let mut tarjan = Tarjan {
        edges,
        index: vec![Tarjan::UNVISITED; len],
        lowlink: vec![0; len],
        on_stack: BitVec::from_elem(len, false),
        stack: vec![],
        frames: vec![],
        next_index: 0,
        components: vec![],
    };
    for root in 0..len {
        if tarjan.index[root] == Tarjan::UNVISITED {
            tarjan.traverse(root);
        }
    }
    tarjan.components
}

struct Tarjan<'a> {
    edges: &'a [Vec<usize>],
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: BitVec,
    stack: Vec<usize>,
    // (node, offset of the next outgoing edge to visit)
    frames: Vec<(usize, usize)>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    const UNVISITED: usize = usize::MAX;

    fn enter(&mut self, v: usize) {
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack.set(v, true);
        self.frames.push((v, 0));
    }

    fn traverse(&mut self, root: usize) {
        self.enter(root);

        while let Some(frame) = self.frames.last_mut() {
            let v = frame.0;
            if let Some(&w) = self.edges[v].get(frame.1) {
                frame.1 += 1;
                if self.index[w] == Self::UNVISITED {
                    self.enter(w);
                } else if self.on_stack[w] {
                    self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                }
                continue;
            }

            self.frames.pop();
            if let Some(&(parent, _)) = self.frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }

            if self.lowlink[v] == self.index[v] {
                let mut component = vec![];
                while let Some(w) = self.stack.pop() {
                    self.on_stack.set(w, false);
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                component.sort_unstable();
                self.components.push(component);
            }
        }
    }
}
