//! Reply tree of a post's comments
//!
//! Comments are stored in an arena and linked by index, so walking a thread
//! never recurses no matter how deep the replies go.

use std::collections::HashMap;

use super::{CommentId, PostComment};

struct Node {
    comment: PostComment,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena of comments with a parent index per node
pub struct CommentTree {
    nodes: Vec<Node>,
    index: HashMap<CommentId, usize>,
    roots: Vec<usize>,
}

impl CommentTree {
    /// Build the tree from a flat list of comments.
    ///
    /// A comment whose parent is missing from the list is treated as a root.
    /// Sibling order follows the input order.
    pub fn from_comments(comments: Vec<PostComment>) -> Self {
        let index: HashMap<CommentId, usize> = comments
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();

        let mut nodes: Vec<Node> = comments
            .into_iter()
            .map(|comment| Node {
                comment,
                parent: None,
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for i in 0..nodes.len() {
            let parent = nodes[i]
                .comment
                .parent_id
                .and_then(|pid| index.get(&pid).copied())
                .filter(|&p| p != i);
            match parent {
                Some(p) => {
                    nodes[i].parent = Some(p);
                    nodes[p].children.push(i);
                }
                None => roots.push(i),
            }
        }

        Self {
            nodes,
            index,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &CommentId) -> Option<&PostComment> {
        self.index.get(id).map(|&i| &self.nodes[i].comment)
    }

    /// Top-level comments
    pub fn roots(&self) -> Vec<&PostComment> {
        self.roots.iter().map(|&i| &self.nodes[i].comment).collect()
    }

    /// Direct replies to a comment
    pub fn children(&self, id: &CommentId) -> Vec<&PostComment> {
        self.index
            .get(id)
            .map(|&i| {
                self.nodes[i]
                    .children
                    .iter()
                    .map(|&c| &self.nodes[c].comment)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of ancestors of a comment
    pub fn depth(&self, id: &CommentId) -> Option<usize> {
        let mut current = *self.index.get(id)?;
        let mut depth = 0;
        while let Some(parent) = self.nodes[current].parent {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// A comment and every reply below it, descendants before ancestors.
    ///
    /// Deleting rows in this order never leaves a reply pointing at a
    /// deleted parent. Empty when the comment is not in the tree.
    pub fn subtree(&self, id: &CommentId) -> Vec<CommentId> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };

        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(self.nodes[i].children.iter().copied());
        }

        order
            .into_iter()
            .rev()
            .map(|i| self.nodes[i].comment.id)
            .collect()
    }

    /// Pre-order walk of the whole thread with each comment's depth
    pub fn flatten(&self) -> Vec<(usize, &PostComment)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();

        while let Some((i, depth)) = stack.pop() {
            out.push((depth, &self.nodes[i].comment));
            for &child in self.nodes[i].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        out
    }
}
