//! Decision variables of the queens model

use super::error::ModelError;
use super::model::{BipModel, VarId, Variable};
use crate::board::{Board, Cell};

/// Handle to the two N×N grids of binary variables registered in a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardVariables {
    size: usize,
    placement: Vec<VarId>,
    attacked: Vec<VarId>,
}

/// Register x and y for every cell of an N×N board in `model`.
///
/// Variables are interleaved per cell (`x_i_j`, then `y_i_j`), row-major.
pub fn declare_variables(model: &mut BipModel, size: usize) -> Result<BoardVariables, ModelError> {
    if size == 0 {
        return Err(ModelError::EmptyBoard);
    }

    let mut placement = Vec::with_capacity(size * size);
    let mut attacked = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            placement.push(model.add_variable(Variable::binary(format!("x_{}_{}", row, col))));
            attacked.push(model.add_variable(Variable::binary(format!("y_{}_{}", row, col))));
        }
    }

    log::debug!("declared {} placement and {} attacked variables", placement.len(), attacked.len());

    Ok(BoardVariables {
        size,
        placement,
        attacked,
    })
}

impl BoardVariables {
    pub fn size(&self) -> usize {
        self.size
    }

    /// x for an in-bounds cell
    pub fn placement(&self, cell: Cell) -> VarId {
        self.placement[cell.row * self.size + cell.col]
    }

    /// y for an in-bounds cell
    pub fn attacked(&self, cell: Cell) -> VarId {
        self.attacked[cell.row * self.size + cell.col]
    }

    pub fn all_placement(&self) -> &[VarId] {
        &self.placement
    }

    pub fn all_attacked(&self) -> &[VarId] {
        &self.attacked
    }

    /// Read the placement grid back from a solver assignment
    pub fn placement_board(&self, values: &[f64]) -> Board {
        self.read_board(&self.placement, values)
    }

    /// Read the attacked grid back from a solver assignment
    pub fn attacked_board(&self, values: &[f64]) -> Board {
        self.read_board(&self.attacked, values)
    }

    fn read_board(&self, vars: &[VarId], values: &[f64]) -> Board {
        Board {
            size: self.size,
            cells: vars
                .iter()
                .map(|var| values.get(var.0).copied().unwrap_or(0.0) > 0.5)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip::model::VariableDomain;

    #[test]
    fn test_declare_variables() {
        let mut model = BipModel::new("test");
        let vars = declare_variables(&mut model, 3).unwrap();

        assert_eq!(model.num_variables(), 18);
        assert_eq!(vars.all_placement().len(), 9);
        assert_eq!(vars.all_attacked().len(), 9);
        assert!(model.variables().iter().all(|v| v.domain == VariableDomain::Binary));

        let x = vars.placement(Cell::new(1, 2));
        let y = vars.attacked(Cell::new(1, 2));
        assert_eq!(model.variable(x).unwrap().name, "x_1_2");
        assert_eq!(model.variable(y).unwrap().name, "y_1_2");
    }

    #[test]
    fn test_unique_ids() {
        let mut model = BipModel::new("test");
        let vars = declare_variables(&mut model, 4).unwrap();
        let mut ids: Vec<_> = vars.all_placement().iter().chain(vars.all_attacked()).copied().collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_empty_board_rejected() {
        let mut model = BipModel::new("test");
        assert_eq!(declare_variables(&mut model, 0), Err(ModelError::EmptyBoard));
        assert_eq!(model.num_variables(), 0);
    }

    #[test]
    fn test_read_boards() {
        let mut model = BipModel::new("test");
        let vars = declare_variables(&mut model, 2).unwrap();
        let mut values = vec![0.0; model.num_variables()];
        values[vars.placement(Cell::new(0, 1)).0] = 1.0;
        values[vars.attacked(Cell::new(1, 0)).0] = 0.9999;

        let placement = vars.placement_board(&values);
        let attacked = vars.attacked_board(&values);
        assert_eq!(placement.marked_cells(), vec![Cell::new(0, 1)]);
        assert_eq!(attacked.marked_cells(), vec![Cell::new(1, 0)]);
    }
}
