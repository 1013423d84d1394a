//! Reference welding solver
//!
//! Prices a sheet as the cheapest of: buying a quoted sheet of that size, or
//! welding two smaller assemblies along a straight seam. A seam costs its
//! length times the item's welding strength.

use std::collections::HashMap;

use shared::validation::validate_order;
use shared::{Order, PriceList};

use crate::error::{CompanyError, CompanyResult};
use crate::traits::Solver;

/// Sheets larger than this on either side are rejected rather than tabulated
pub const MAX_SIDE: u32 = 512;

/// Dynamic-programming solver over guillotine welds
#[derive(Debug, Clone, Default)]
pub struct WeldingSolver;

impl WeldingSolver {
    pub fn new() -> Self {
        Self
    }

    fn quoted_costs(price_list: &PriceList) -> HashMap<(u32, u32), f64> {
        let mut quotes = HashMap::new();
        for entry in &price_list.entries {
            let shape = entry.shape;
            for key in [(shape.width, shape.height), (shape.height, shape.width)] {
                quotes
                    .entry(key)
                    .and_modify(|cost: &mut f64| *cost = cost.min(entry.cost))
                    .or_insert(entry.cost);
            }
        }
        quotes
    }

    /// Cheapest assembly cost of a `width x height` sheet, if any exists
    fn assemble(quotes: &HashMap<(u32, u32), f64>, width: u32, height: u32, strength: f64) -> Option<f64> {
        let (w_max, h_max) = (width as usize, height as usize);
        let mut best = vec![vec![f64::INFINITY; h_max + 1]; w_max + 1];

        for w in 1..=w_max {
            for h in 1..=h_max {
                let mut cost = quotes.get(&(w as u32, h as u32)).copied().unwrap_or(f64::INFINITY);

                // vertical seam of length h
                for left in 1..=w / 2 {
                    cost = cost.min(best[left][h] + best[w - left][h] + h as f64 * strength);
                }
                // horizontal seam of length w
                for bottom in 1..=h / 2 {
                    cost = cost.min(best[w][bottom] + best[w][h - bottom] + w as f64 * strength);
                }

                best[w][h] = cost;
            }
        }

        let cost = best[w_max][h_max];
        cost.is_finite().then_some(cost)
    }
}

impl Solver for WeldingSolver {
    fn solve(&self, orders: &mut [Order], price_list: &PriceList) -> CompanyResult<()> {
        let quotes = Self::quoted_costs(price_list);

        for order in orders.iter_mut() {
            if order.material != price_list.material {
                return Err(CompanyError::solver(
                    order.material,
                    format!("price list is for {}", price_list.material),
                ));
            }
            validate_order(order)?;

            for item in order.items.iter_mut() {
                let shape = item.shape;
                if shape.width > MAX_SIDE || shape.height > MAX_SIDE {
                    return Err(CompanyError::solver(
                        order.material,
                        format!("sheet {shape} exceeds {MAX_SIDE} on a side"),
                    ));
                }
                item.cost = Self::assemble(&quotes, shape.width, shape.height, item.welding_strength);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MaterialId;

    #[test]
    fn test_exact_quote_is_used() {
        let list = PriceList::new(MaterialId(1)).with_entry(3, 4, 8.0);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(4, 3, 100.0)];

        WeldingSolver::new().solve(&mut orders, &list).unwrap();

        assert_eq!(orders[0].items[0].cost, Some(8.0));
    }

    #[test]
    fn test_welding_two_halves() {
        // 2x1 quoted at 1; a 2x2 sheet is two of them plus a seam of length 2
        let list = PriceList::new(MaterialId(1)).with_entry(2, 1, 1.0);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(2, 2, 0.5)];

        WeldingSolver::new().solve(&mut orders, &list).unwrap();

        assert_eq!(orders[0].items[0].cost, Some(3.0));
    }

    #[test]
    fn test_cheaper_quote_beats_welding() {
        let list = PriceList::new(MaterialId(1))
            .with_entry(1, 1, 1.0)
            .with_entry(2, 2, 2.5);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(2, 2, 1.0)];

        WeldingSolver::new().solve(&mut orders, &list).unwrap();

        assert_eq!(orders[0].items[0].cost, Some(2.5));
    }

    #[test]
    fn test_unreachable_sheet_stays_unpriced() {
        let list = PriceList::new(MaterialId(1)).with_entry(2, 2, 1.0);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(3, 3, 1.0)];

        WeldingSolver::new().solve(&mut orders, &list).unwrap();

        assert_eq!(orders[0].items[0].cost, None);
    }

    #[test]
    fn test_material_mismatch_is_an_error() {
        let list = PriceList::new(MaterialId(2)).with_entry(1, 1, 1.0);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(1, 1, 1.0)];

        let result = WeldingSolver::new().solve(&mut orders, &list);

        assert!(matches!(result, Err(CompanyError::SolverFailed { .. })));
    }

    #[test]
    fn test_invalid_item_is_an_error() {
        let list = PriceList::new(MaterialId(1)).with_entry(1, 1, 1.0);
        let mut orders = vec![Order::new(MaterialId(1)).with_item(0, 1, 1.0)];

        let result = WeldingSolver::new().solve(&mut orders, &list);

        assert!(matches!(result, Err(CompanyError::SharedError(_))));
    }
}
