//! Cost Graph Resolver - rolls purchase costs up through nested sub-recipes.
//!
//! Ingredients form a directed graph: a composed ingredient depends on every
//! ingredient in its own recipe. The graph is held as an arena of nodes
//! addressed by index, and resolved with an explicit-stack depth-first
//! traversal that tracks `Unvisited / InProgress / Done` per node. Reaching
//! an `InProgress` node means the current path loops back on itself, and the
//! whole request fails with the cycle members; nothing is partially resolved.
//!
//! Resolution is always recomputed from current leaf costs. The stored
//! `unit_cost` of a composed ingredient is only read when it has no recipe.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CostingError, DataQualityWarning};
use crate::domain::catalog::{BomLine, BomOwner, Ingredient};
use crate::domain::foundation::IngredientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone)]
struct Edge {
    target: usize,
    quantity: f64,
}

#[derive(Debug, Clone)]
struct Node {
    id: IngredientId,
    stored_cost: f64,
    is_composed: bool,
    /// Yield used for division, already clamped to a positive value.
    divisor: f64,
    /// True for composed ingredients that own at least one recipe line.
    has_recipe: bool,
    edges: Vec<Edge>,
}

/// Immutable ingredient dependency graph for one business.
#[derive(Debug, Clone)]
pub struct CostGraph {
    nodes: Vec<Node>,
    index: HashMap<IngredientId, usize>,
    warnings: Vec<DataQualityWarning>,
}

/// Resolved cost of one ingredient next to the cost currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCost {
    pub ingredient_id: IngredientId,
    pub is_composed: bool,
    pub stored_cost: f64,
    pub resolved_cost: f64,
}

impl ResolvedCost {
    /// True when the stored cost is out of date.
    pub fn is_stale(&self) -> bool {
        (self.stored_cost - self.resolved_cost).abs() > 1e-9
    }
}

/// Result of resolving the whole graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResolution {
    /// One entry per ingredient, in input order.
    pub costs: Vec<ResolvedCost>,
    pub warnings: Vec<DataQualityWarning>,
    #[serde(skip)]
    index: HashMap<IngredientId, usize>,
}

impl CostResolution {
    /// Resolved unit cost, `None` for ingredients outside the graph.
    pub fn cost_of(&self, id: &IngredientId) -> Option<f64> {
        self.index.get(id).map(|&i| self.costs[i].resolved_cost)
    }

    /// Composed ingredients whose stored cost differs from the resolved one.
    /// This is the write set a caller persists after resolution.
    pub fn changed_composed_costs(&self) -> Vec<ResolvedCost> {
        self.costs
            .iter()
            .filter(|c| c.is_composed && c.is_stale())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl CostGraph {
    /// Builds the graph from a business's ingredients and BOM lines.
    ///
    /// Product-owned lines are not part of the ingredient graph and are
    /// ignored here. Data problems are recorded as warnings; building never
    /// fails.
    pub fn build(ingredients: &[Ingredient], bom_lines: &[BomLine]) -> Self {
        let mut nodes = Vec::with_capacity(ingredients.len());
        let mut index = HashMap::with_capacity(ingredients.len());
        let mut warnings = Vec::new();

        for ingredient in ingredients {
            if index.contains_key(&ingredient.id) {
                continue;
            }
            let divisor = if ingredient.is_composed
                && (!ingredient.yield_quantity.is_finite() || ingredient.yield_quantity <= 0.0)
            {
                warnings.push(DataQualityWarning::NonPositiveYield {
                    ingredient_id: ingredient.id,
                    yield_quantity: ingredient.yield_quantity,
                });
                1.0
            } else if ingredient.is_composed {
                ingredient.yield_quantity
            } else {
                1.0
            };

            index.insert(ingredient.id, nodes.len());
            nodes.push(Node {
                id: ingredient.id,
                stored_cost: ingredient.unit_cost,
                is_composed: ingredient.is_composed,
                divisor,
                has_recipe: false,
                edges: Vec::new(),
            });
        }

        let mut ignored_on_purchased: HashMap<usize, usize> = HashMap::new();
        for line in bom_lines {
            let owner_id = match line.owner {
                BomOwner::Ingredient(id) => id,
                BomOwner::Product(_) => continue,
            };
            let Some(&owner) = index.get(&owner_id) else {
                warn!(owner_id = %owner_id, "BOM line owned by unknown ingredient ignored");
                continue;
            };
            if !nodes[owner].is_composed {
                *ignored_on_purchased.entry(owner).or_insert(0) += 1;
                continue;
            }
            nodes[owner].has_recipe = true;

            if !line.quantity_per_batch.is_finite() || line.quantity_per_batch <= 0.0 {
                warnings.push(DataQualityWarning::NonPositiveQuantity {
                    owner: line.owner,
                    ingredient_id: line.ingredient_id,
                    quantity: line.quantity_per_batch,
                });
                continue;
            }
            match index.get(&line.ingredient_id) {
                Some(&target) => nodes[owner].edges.push(Edge {
                    target,
                    quantity: line.quantity_per_batch,
                }),
                None => warnings.push(DataQualityWarning::UnknownIngredient {
                    owner: line.owner,
                    ingredient_id: line.ingredient_id,
                }),
            }
        }

        let mut ignored: Vec<_> = ignored_on_purchased.into_iter().collect();
        ignored.sort_unstable_by_key(|(node, _)| *node);
        for (node, line_count) in ignored {
            warnings.push(DataQualityWarning::LinesOnPurchasedIngredient {
                ingredient_id: nodes[node].id,
                line_count,
            });
        }
        for node in nodes.iter().filter(|n| n.is_composed && !n.has_recipe) {
            warnings.push(DataQualityWarning::ComposedWithoutRecipe {
                ingredient_id: node.id,
            });
        }

        for warning in &warnings {
            warn!(warning = %warning, "Data quality warning in cost graph");
        }

        Self {
            nodes,
            index,
            warnings,
        }
    }

    /// Warnings found while building the graph.
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Resolves every ingredient.
    ///
    /// # Errors
    ///
    /// `CyclicComposition` if any composed ingredient contains itself.
    pub fn resolve_all(&self) -> Result<CostResolution, CostingError> {
        let costs = self.roll_up_all(&|node: &Node| node.stored_cost)?;

        let resolved: Vec<ResolvedCost> = self
            .nodes
            .iter()
            .zip(costs)
            .map(|(node, resolved_cost)| ResolvedCost {
                ingredient_id: node.id,
                is_composed: node.is_composed,
                stored_cost: node.stored_cost,
                resolved_cost,
            })
            .collect();

        debug!(
            ingredients = resolved.len(),
            stale = resolved.iter().filter(|c| c.is_composed && c.is_stale()).count(),
            warnings = self.warnings.len(),
            "Resolved ingredient cost graph"
        );

        Ok(CostResolution {
            costs: resolved,
            warnings: self.warnings.clone(),
            index: self.index.clone(),
        })
    }

    /// Resolves one ingredient, visiting only the subgraph reachable from it.
    ///
    /// # Errors
    ///
    /// - `UnknownIngredient` if `id` is not in the graph
    /// - `CyclicComposition` if the reachable subgraph contains a cycle
    pub fn resolve(&self, id: &IngredientId) -> Result<f64, CostingError> {
        let root = *self
            .index
            .get(id)
            .ok_or(CostingError::UnknownIngredient(*id))?;
        let mut state = vec![VisitState::Unvisited; self.nodes.len()];
        let mut costs = vec![0.0; self.nodes.len()];
        self.visit(root, &mut state, &mut costs, &|node: &Node| node.stored_cost)?;
        Ok(costs[root])
    }

    /// Rolls a per-ingredient quantity up through recipes the same way cost
    /// is rolled up: leaves (purchased ingredients and composed ones without
    /// a recipe) take `leaf_value`, composed ingredients take
    /// `sum(qty * child) / yield`.
    ///
    /// Used to carry a cost increase of a purchased ingredient into every
    /// composed ingredient that contains it.
    ///
    /// # Errors
    ///
    /// `CyclicComposition` if any composed ingredient contains itself.
    pub fn roll_up<F>(&self, leaf_value: F) -> Result<HashMap<IngredientId, f64>, CostingError>
    where
        F: Fn(&IngredientId) -> f64,
    {
        let values = self.roll_up_all(&|node: &Node| leaf_value(&node.id))?;
        Ok(self
            .nodes
            .iter()
            .zip(values)
            .map(|(node, value)| (node.id, value))
            .collect())
    }

    fn roll_up_all(&self, leaf_value: &dyn Fn(&Node) -> f64) -> Result<Vec<f64>, CostingError> {
        let mut state = vec![VisitState::Unvisited; self.nodes.len()];
        let mut values = vec![0.0; self.nodes.len()];
        for root in 0..self.nodes.len() {
            self.visit(root, &mut state, &mut values, leaf_value)?;
        }
        Ok(values)
    }

    /// Checks whether adding `ingredient_id` to `owner`'s recipe would close
    /// a cycle. Product owners never can.
    ///
    /// # Errors
    ///
    /// - `UnknownIngredient` if either ingredient is not in the graph
    /// - `CyclicComposition` with the would-be cycle, starting at the owner
    pub fn check_new_line(
        &self,
        owner: BomOwner,
        ingredient_id: &IngredientId,
    ) -> Result<(), CostingError> {
        let owner_id = match owner {
            BomOwner::Product(_) => return Ok(()),
            BomOwner::Ingredient(id) => id,
        };
        let owner_idx = *self
            .index
            .get(&owner_id)
            .ok_or(CostingError::UnknownIngredient(owner_id))?;
        let start = *self
            .index
            .get(ingredient_id)
            .ok_or(CostingError::UnknownIngredient(*ingredient_id))?;

        if start == owner_idx {
            return Err(CostingError::CyclicComposition {
                members: vec![owner_id],
            });
        }

        // Breadth-first search from the new child back to the owner.
        let mut parent: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;

        while let Some(node) = queue.pop_front() {
            for edge in &self.nodes[node].edges {
                if seen[edge.target] {
                    continue;
                }
                seen[edge.target] = true;
                parent[edge.target] = Some(node);
                if edge.target == owner_idx {
                    let mut path = Vec::new();
                    let mut cursor = parent[owner_idx];
                    while let Some(step) = cursor {
                        path.push(self.nodes[step].id);
                        cursor = parent[step];
                    }
                    path.reverse();
                    let mut members = vec![owner_id];
                    members.extend(path);
                    return Err(CostingError::CyclicComposition { members });
                }
                queue.push_back(edge.target);
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        root: usize,
        state: &mut [VisitState],
        values: &mut [f64],
        leaf_value: &dyn Fn(&Node) -> f64,
    ) -> Result<(), CostingError> {
        if state[root] == VisitState::Done {
            return Ok(());
        }

        // Each frame is (node, index of the next edge to follow).
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        state[root] = VisitState::InProgress;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            match self.nodes[node].edges.get(frame.1) {
                Some(edge) => {
                    frame.1 += 1;
                    let child = edge.target;
                    match state[child] {
                        VisitState::Done => {}
                        VisitState::InProgress => {
                            return Err(self.cycle_error(&stack, child));
                        }
                        VisitState::Unvisited => {
                            state[child] = VisitState::InProgress;
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    values[node] = self.node_value(node, values, leaf_value);
                    state[node] = VisitState::Done;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    /// Value of a node whose dependencies are all resolved.
    fn node_value(&self, node: usize, values: &[f64], leaf_value: &dyn Fn(&Node) -> f64) -> f64 {
        let node = &self.nodes[node];
        if !node.is_composed || !node.has_recipe {
            return leaf_value(node);
        }
        let batch: f64 = node
            .edges
            .iter()
            .map(|edge| edge.quantity * values[edge.target])
            .sum();
        batch / node.divisor
    }

    fn cycle_error(&self, stack: &[(usize, usize)], repeated: usize) -> CostingError {
        let start = stack
            .iter()
            .position(|(node, _)| *node == repeated)
            .unwrap_or(0);
        let members = stack[start..]
            .iter()
            .map(|(node, _)| self.nodes[*node].id)
            .collect();
        CostingError::CyclicComposition { members }
    }
}
