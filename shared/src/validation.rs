//! Input validation for data crossing collaborator boundaries

use crate::errors::{SharedError, SharedResult};
use crate::types::{Order, PriceList, Shape};

fn validate_shape(shape: &Shape) -> SharedResult<()> {
    if shape.width == 0 || shape.height == 0 {
        return Err(SharedError::InvalidShape {
            width: shape.width,
            height: shape.height,
        });
    }
    Ok(())
}

/// Every quoted sheet must have non-zero sides and a finite, non-negative cost
pub fn validate_price_list(list: &PriceList) -> SharedResult<()> {
    for entry in &list.entries {
        validate_shape(&entry.shape)?;
        if !entry.cost.is_finite() || entry.cost < 0.0 {
            return Err(SharedError::InvalidCost {
                shape: entry.shape.to_string(),
                cost: entry.cost,
            });
        }
    }
    Ok(())
}

/// Every requested sheet must have non-zero sides and a usable welding strength
pub fn validate_order(order: &Order) -> SharedResult<()> {
    for item in &order.items {
        validate_shape(&item.shape)?;
        if !item.welding_strength.is_finite() || item.welding_strength < 0.0 {
            return Err(SharedError::InvalidWeldingStrength {
                shape: item.shape.to_string(),
                value: item.welding_strength,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaterialId;

    #[test]
    fn test_valid_price_list_passes() {
        let list = PriceList::new(MaterialId(1)).with_entry(2, 3, 4.5);
        assert!(validate_price_list(&list).is_ok());
    }

    #[test]
    fn test_zero_sized_shape_rejected() {
        let list = PriceList::new(MaterialId(1)).with_entry(0, 3, 4.5);
        assert!(matches!(
            validate_price_list(&list),
            Err(SharedError::InvalidShape { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_negative_and_nan_costs_rejected() {
        let negative = PriceList::new(MaterialId(1)).with_entry(1, 1, -1.0);
        let nan = PriceList::new(MaterialId(1)).with_entry(1, 1, f64::NAN);

        assert!(matches!(validate_price_list(&negative), Err(SharedError::InvalidCost { .. })));
        assert!(matches!(validate_price_list(&nan), Err(SharedError::InvalidCost { .. })));
    }

    #[test]
    fn test_order_validation() {
        let good = Order::new(MaterialId(2)).with_item(4, 4, 1.0);
        let bad = Order::new(MaterialId(2)).with_item(4, 4, f64::INFINITY);
        let negative = Order::new(MaterialId(2)).with_item(1, 1, 0.5).with_item(2, 3, -0.5);

        assert!(validate_order(&good).is_ok());
        assert!(matches!(
            validate_order(&bad),
            Err(SharedError::InvalidWeldingStrength { value, .. }) if value.is_infinite()
        ));
        match validate_order(&negative) {
            Err(SharedError::InvalidWeldingStrength { shape, value }) => {
                assert_eq!(shape, "2x3");
                assert_eq!(value, -0.5);
            }
            other => panic!("expected InvalidWeldingStrength, got {other:?}"),
        }
    }
}
