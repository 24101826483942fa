//! Evolution lineage walk.
//!
//! Branching evolutions only keep the primary branch: at every node the
//! first entry of `evolves_to` is followed.

use crate::upstream::ChainLink;

/// Species names from the root of the chain down its primary branch.
pub fn primary_lineage(root: &ChainLink) -> Vec<String> {
    let mut lineage = Vec::new();
    let mut node = Some(root);
    while let Some(link) = node {
        lineage.push(link.species.name.clone());
        node = link.evolves_to.first();
    }
    lineage
}
