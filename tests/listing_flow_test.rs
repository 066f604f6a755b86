mod listing_flow_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    use rental_scout::api::{to_query_string, ApiError, ApiResult, FilterCriteria, FilterField, PropertyApi};
    use rental_scout::listing::{
        FilterState, ListingController, ListingView, MapBridge, MapView, PriceBoard, PriceDisplay,
    };
    use rental_scout::Config;
    use rental_scout::models::{
        DateRange, NearbyResponse, PriceCalculation, PropertyDetail, PropertyId,
        PropertyListResponse,
    };

    /// Backend serving two properties in Paris and Lyon; pricing for Lyon is down
    struct TwoCityBackend;

    fn listing() -> PropertyListResponse {
        serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "name": "Marais flat", "property_type": "Apartment",
                 "city": "Paris", "country": "France", "latitude": 48.8, "longitude": 2.3,
                 "bedrooms": 1, "bathrooms": "1.0", "max_guests": 2,
                 "base_price_per_night": "110.00", "currency": "EUR",
                 "amenities": ["WiFi", "Kitchen", "TV", "Heating"], "primary_image": null},
                {"id": 2, "name": "Presqu'ile loft", "property_type": "Loft",
                 "city": "Lyon", "country": "France", "latitude": 45.76, "longitude": 4.83,
                 "bedrooms": 2, "bathrooms": "1.5", "max_guests": 4,
                 "base_price_per_night": "95.50", "currency": "EUR",
                 "amenities": [], "primary_image": null}
            ],
            "filters_applied": {"property_type": null, "city": null,
                                "min_price": null, "max_price": null, "geolocation": false}
        }))
        .unwrap()
    }

    #[async_trait]
    impl PropertyApi for TwoCityBackend {
        async fn list_properties(&self, criteria: &FilterCriteria) -> ApiResult<PropertyListResponse> {
            if criteria.city.as_deref() == Some("Atlantis") {
                return Ok(PropertyListResponse::default());
            }
            Ok(listing())
        }

        async fn get_property(&self, _id: PropertyId) -> ApiResult<PropertyDetail> {
            Err(ApiError::Backend { status: 404, body: String::new() })
        }

        async fn nearby(&self, _lat: f64, _lng: f64, _radius: f64) -> ApiResult<NearbyResponse> {
            Err(ApiError::Backend { status: 404, body: String::new() })
        }

        async fn availability(&self, _id: PropertyId) -> ApiResult<serde_json::Value> {
            Ok(json!({}))
        }

        async fn calculate_price(&self, id: PropertyId, range: DateRange) -> ApiResult<PriceCalculation> {
            if id == 2 {
                return Err(ApiError::Backend { status: 503, body: "pricing down".to_string() });
            }
            let nights = (range.check_out - range.check_in).num_days() as u32;
            Ok(serde_json::from_value(json!({
                "nights": nights,
                "total_price": "330.00",
                "average_price_per_night": "110.00",
                "currency": "EUR"
            }))
            .unwrap())
        }
    }

    fn stay() -> (Option<NaiveDate>, Option<NaiveDate>) {
        (NaiveDate::from_ymd_opt(2024, 9, 1), NaiveDate::from_ymd_opt(2024, 9, 4))
    }

    #[test]
    fn berlin_query_string() {
        let mut state = FilterState::default();
        let criteria = state.update([
            FilterField::City(Some("Berlin".to_string())),
            FilterField::MinPrice(Some(Decimal::from(50))),
        ]);
        let query = to_query_string(criteria);
        assert!(query.contains("city=Berlin&min_price=50&page_size=20"));
        assert!(!query.contains("max_price"));
        assert!(!query.contains("search"));
    }

    #[tokio::test]
    async fn quotes_fail_per_card_and_clear_with_dates() {
        let api = Arc::new(TwoCityBackend);
        let mut controller = ListingController::new(api.clone(), FilterCriteria::default());
        let mut prices = PriceBoard::new(api);
        let (check_in, check_out) = stay();

        controller
            .update([FilterField::CheckIn(check_in), FilterField::CheckOut(check_out)])
            .await;
        prices.sync(controller.results(), controller.date_range());
        prices.settle().await;

        let paris = &controller.results()[0];
        let lyon = &controller.results()[1];
        assert_eq!(
            prices.display(paris).to_string(),
            "330.00 EUR total · 110.00 EUR/night avg"
        );
        assert_eq!(
            prices.display(lyon),
            PriceDisplay::Base { per_night: "95.50".parse().unwrap(), currency: "EUR".to_string() }
        );

        controller.update([FilterField::CheckIn(None)]).await;
        prices.sync(controller.results(), controller.date_range());
        assert_eq!(prices.display(&controller.results()[0]).to_string(), "110.00 EUR/night");
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let mut controller = ListingController::new(Arc::new(TwoCityBackend), FilterCriteria::default());
        controller.update([FilterField::City(Some("Atlantis".to_string()))]).await;
        assert_eq!(controller.view(), ListingView::NoResults);
    }

    #[tokio::test]
    async fn map_click_drives_a_geo_search() {
        let api = Arc::new(TwoCityBackend);
        let mut controller = ListingController::new(api, FilterCriteria::default());
        let mut map = MapBridge::from_config(&Config::default());

        controller.refresh().await;
        assert_eq!(controller.map_center(), (48.8, 2.3));

        map.mount();
        let selection = map.click(45.7, 4.8, controller.criteria().radius);
        controller.select_location(selection).await;

        assert_eq!(controller.criteria().radius, Some(10.0));
        assert_eq!(controller.map_center(), (45.7, 4.8));

        match map.render(controller.results(), controller.map_center()) {
            MapView::Ready(scene) => {
                assert_eq!(scene.markers.len(), 2);
                assert_eq!(scene.search_area.unwrap().radius_meters(), 10_000.0);
            }
            MapView::Placeholder(_) => panic!("map should be mounted"),
        }
    }
}
