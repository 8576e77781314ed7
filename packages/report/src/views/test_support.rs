//! A small but complete snapshot shared by the view tests.

use realty_dash_market_models::RootData;

pub fn snapshot() -> RootData {
    serde_json::from_str(SNAPSHOT).unwrap()
}

const SNAPSHOT: &str = r#"{
  "projects": [
    {
      "jk_name": "Берег",
      "apartments_by_type": {
        "Studio": {
          "current_metrics": {
            "apartment_count": 12,
            "min_area": 22, "average_area": 25, "max_area": 28,
            "min_lot_price_mln": 6.1, "average_lot_price_mln": 7.5, "max_lot_price_mln": 8.4,
            "min_sqm_price_ths": 270, "average_sqm_price_ths": 300, "max_sqm_price_ths": 320
          },
          "weekly_change": { "sqm_price_change_percent": 0.2, "sqm_price_change_ths": 0.6 },
          "biweekly_change": { "sqm_price_change_percent": 0.5, "sqm_price_change_ths": 1.5 },
          "monthly_change": {
            "sqm_price_change_percent": 1.0, "lot_price_change_percent": 0.8, "sqm_price_change_ths": 3.0
          },
          "historical_sqm_prices": {
            "one_month_ago_ths": 297, "three_months_ago_ths": 290, "six_months_ago_ths": 280,
            "one_month_change_percent": 1.0, "three_months_change_percent": 3.4, "six_months_change_percent": 7.1
          },
          "mortgage_calculation": {
            "current_monthly_payment_ths": 60,
            "biweekly_change": { "percent_change": 0.5, "absolute_change_ths": 0.3 }
          },
          "price_prediction": {
            "2025-05": {
              "month_label": "Май 2025",
              "average_predicted_sqm_price_ths": 305,
              "predicted_sqm_price_range_ths": { "pessimistic": 298, "optimistic": 311 },
              "average_predicted_lot_price_mln": 7.6,
              "expected_growth_percent": 1.7,
              "prediction_accuracy_percent": 82
            }
          },
          "washout_analysis": { "washed_out_count": 2 }
        },
        "2-room": {
          "current_metrics": {
            "apartment_count": 5,
            "average_area": 60, "average_lot_price_mln": 15, "average_sqm_price_ths": 250
          },
          "monthly_change": { "sqm_price_change_percent": -0.5, "sqm_price_change_ths": -1.25 },
          "mortgage_calculation": { "current_monthly_payment_ths": 120 }
        }
      },
      "floor_breakdown": {
        "3": { "Studio": { "count": 4, "average_area": 25, "average_price": 7500000 } },
        "12": { "2-room": { "count": 1, "average_area": 60, "average_price": 15600000 } }
      },
      "promotions": [
        { "type": "Ипотека", "description": "Семейная 6%" },
        { "description": "Кладовая в подарок" }
      ],
      "price_dynamics": {
        "2025-02": { "year": 2025, "month": 2, "average_sqm_price_ths": 290 },
        "2025-03": { "year": 2025, "month": 3, "average_sqm_price_ths": 297 },
        "2025-04": { "year": 2025, "month": 4, "average_sqm_price_ths": 300 }
      },
      "mortgage_config": { "down_payment_percent": 20 }
    },
    {
      "jk_name": "Азимут",
      "apartments_by_type": {
        "studio": {
          "current_metrics": {
            "apartment_count": 8,
            "average_area": 27, "average_lot_price_mln": 7.0, "average_sqm_price_ths": 260
          },
          "mortgage_calculation": { "current_monthly_payment_ths": 55 },
          "washout_analysis": { "washed_out_count": 1 }
        }
      },
      "promotions": [{ "type": "Скидки", "description": "5% при 100% оплате" }]
    }
  ],
  "last_updated": "2025-04-30T09:00:00Z"
}"#;
