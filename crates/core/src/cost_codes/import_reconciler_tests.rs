#[cfg(test)]
mod tests {
    use crate::cost_codes::mock_repository::MockCostCodeRepository;
    use crate::cost_codes::{
        CostCodeImportRequest, CostCodeImportRow, CostCodeImporter, CostCodeService,
        CostCodeServiceTrait, DivisionImportRow, OrderValue,
    };
    use crate::errors::{Error, ValidationError};
    use std::sync::Arc;

    const CORP: &str = "corp-1";

    fn division(number: &str, name: &str, order: i64) -> DivisionImportRow {
        DivisionImportRow {
            division_number: Some(number.to_string()),
            division_name: Some(name.to_string()),
            division_order: Some(OrderValue::Number(order)),
            ..Default::default()
        }
    }

    fn cost_code(number: &str, division: Option<&str>, parent: Option<&str>) -> CostCodeImportRow {
        CostCodeImportRow {
            cost_code_number: Some(number.to_string()),
            cost_code_name: Some(format!("Cost code {}", number)),
            division_number: division.map(str::to_string),
            parent_cost_code_number: parent.map(str::to_string),
            ..Default::default()
        }
    }

    fn request(
        divisions: Vec<DivisionImportRow>,
        configurations: Vec<CostCodeImportRow>,
    ) -> CostCodeImportRequest {
        CostCodeImportRequest {
            corporation_uuid: Some(CORP.to_string()),
            divisions,
            configurations,
        }
    }

    fn setup() -> (MockCostCodeRepository, CostCodeService) {
        let repository = MockCostCodeRepository::new();
        let service = CostCodeService::new(Arc::new(repository.clone()));
        (repository, service)
    }

    #[tokio::test]
    async fn test_single_division_and_cost_code() {
        let (repository, service) = setup();

        let response = service
            .import_cost_codes(request(
                vec![division("01", "General", 1)],
                vec![CostCodeImportRow {
                    cost_code_name: Some("Mobilization".to_string()),
                    ..cost_code("01010", Some("01"), None)
                }],
            ))
            .await
            .unwrap();

        assert!(response.success);
        let data = response.data;
        assert_eq!(data.divisions.new_count, 1);
        assert_eq!(data.divisions.duplicates, 0);
        assert!(data.divisions.errors.is_empty());
        assert_eq!(data.configurations.new_count, 1);
        assert_eq!(data.configurations.duplicates, 0);
        assert!(data.configurations.errors.is_empty());

        let created_division = repository.division_by_number("01").unwrap();
        let created_cost_code = repository.configuration_by_number("01010").unwrap();
        assert_eq!(created_cost_code.cost_code_name, "Mobilization");
        assert_eq!(
            created_cost_code.division_id.as_deref(),
            Some(created_division.id.as_str())
        );
        assert_eq!(created_cost_code.parent_cost_code_id, None);
    }

    #[tokio::test]
    async fn test_resubmitted_division_is_duplicate() {
        let (repository, service) = setup();
        let first = service
            .import_cost_codes(request(vec![division("01", "General", 1)], vec![]))
            .await
            .unwrap();
        assert_eq!(first.data.divisions.new_count, 1);

        let second = service
            .import_cost_codes(request(vec![division("01", "Renamed", 7)], vec![]))
            .await
            .unwrap();
        assert_eq!(second.data.divisions.new_count, 0);
        assert_eq!(second.data.divisions.duplicates, 1);
        assert!(second.data.divisions.errors.is_empty());

        let stored = repository.division_by_number("01").unwrap();
        assert_eq!(stored.division_name, "General");
        assert_eq!(stored.division_order, 1);
        assert_eq!(repository.divisions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_division_order_is_accepted() {
        let (_, service) = setup();
        let response = service
            .import_cost_codes(request(
                vec![
                    division("01", "General", 5),
                    division("02", "Site Work", 5),
                    division("03", "Concrete", 5),
                ],
                vec![],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.divisions.new_count, 3);
        assert!(response.data.divisions.errors.is_empty());
    }

    #[tokio::test]
    async fn test_division_order_out_of_range() {
        let (repository, service) = setup();
        for order in [0, 101, -3] {
            let response = service
                .import_cost_codes(request(vec![division("09", "Finishes", order)], vec![]))
                .await
                .unwrap();
            assert_eq!(response.data.divisions.new_count, 0);
            assert_eq!(response.data.divisions.errors.len(), 1);
            assert!(response.data.divisions.errors[0].contains("Order must be between 1 and 100"));
        }
        assert!(repository.divisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cost_code_order_out_of_range() {
        let (repository, service) = setup();
        let response = service
            .import_cost_codes(request(
                vec![],
                vec![CostCodeImportRow {
                    order: Some(OrderValue::Number(201)),
                    ..cost_code("01010", None, None)
                }],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 0);
        assert_eq!(response.data.configurations.errors.len(), 1);
        assert_eq!(
            response.data.configurations.errors[0],
            "Cost code 01010: Order must be between 1 and 200"
        );
        assert!(repository.configurations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_three_level_chain_in_any_order() {
        let orders = [
            vec![
                cost_code("A", None, None),
                cost_code("B", None, Some("A")),
                cost_code("C", None, Some("B")),
            ],
            vec![
                cost_code("C", None, Some("B")),
                cost_code("B", None, Some("A")),
                cost_code("A", None, None),
            ],
            vec![
                cost_code("B", None, Some("A")),
                cost_code("A", None, None),
                cost_code("C", None, Some("B")),
            ],
        ];

        for rows in orders {
            let (repository, service) = setup();
            let response = service.import_cost_codes(request(vec![], rows)).await.unwrap();
            assert_eq!(response.data.configurations.new_count, 3);
            assert!(response.data.configurations.errors.is_empty());

            let a = repository.configuration_by_number("A").unwrap();
            let b = repository.configuration_by_number("B").unwrap();
            let c = repository.configuration_by_number("C").unwrap();
            assert_eq!(a.parent_cost_code_id, None);
            assert_eq!(b.parent_cost_code_id.as_deref(), Some(a.id.as_str()));
            assert_eq!(c.parent_cost_code_id.as_deref(), Some(b.id.as_str()));
        }
    }

    #[tokio::test]
    async fn test_missing_parent_is_reported() {
        let (repository, service) = setup();
        let response = service
            .import_cost_codes(request(vec![], vec![cost_code("01010", None, Some("99999"))]))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 0);
        assert_eq!(
            response.data.configurations.errors,
            vec!["Cost code 01010: Parent cost code '99999' not found".to_string()]
        );
        assert!(repository.configuration_by_number("01010").is_none());
    }

    #[tokio::test]
    async fn test_parent_from_previous_import() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(vec![], vec![cost_code("01000", None, None)]))
            .await
            .unwrap();

        let response = service
            .import_cost_codes(request(
                vec![],
                vec![
                    cost_code("01011", None, Some("01010")),
                    cost_code("01010", None, Some("01000")),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 2);

        let root = repository.configuration_by_number("01000").unwrap();
        let mid = repository.configuration_by_number("01010").unwrap();
        let leaf = repository.configuration_by_number("01011").unwrap();
        assert_eq!(mid.parent_cost_code_id.as_deref(), Some(root.id.as_str()));
        assert_eq!(leaf.parent_cost_code_id.as_deref(), Some(mid.id.as_str()));
    }

    #[tokio::test]
    async fn test_fourth_level_under_stored_chain_is_rejected() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(
                vec![],
                vec![
                    cost_code("A", None, None),
                    cost_code("B", None, Some("A")),
                    cost_code("C", None, Some("B")),
                ],
            ))
            .await
            .unwrap();

        let response = service
            .import_cost_codes(request(vec![], vec![cost_code("D", None, Some("C"))]))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 0);
        assert_eq!(
            response.data.configurations.errors,
            vec!["Cost code D: Exceeds the maximum nesting depth of 3 levels".to_string()]
        );
        assert!(repository.configuration_by_number("D").is_none());
    }

    #[tokio::test]
    async fn test_repeated_stored_parent_cannot_deepen_the_tree() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(
                vec![],
                vec![
                    cost_code("A", None, None),
                    cost_code("B", None, Some("A")),
                    cost_code("C", None, Some("B")),
                ],
            ))
            .await
            .unwrap();

        let response = service
            .import_cost_codes(request(
                vec![],
                vec![cost_code("C", None, None), cost_code("D", None, Some("C"))],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 0);
        assert_eq!(response.data.configurations.duplicates, 1);
        assert_eq!(
            response.data.configurations.errors,
            vec!["Cost code D: Exceeds the maximum nesting depth of 3 levels".to_string()]
        );
        assert!(repository.configuration_by_number("D").is_none());
        assert_eq!(
            repository.configuration_by_number("C").unwrap().parent_cost_code_id,
            Some(repository.configuration_by_number("B").unwrap().id)
        );
    }

    #[tokio::test]
    async fn test_level_zero_reuses_partition_read() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(
                vec![],
                vec![cost_code("A", None, None), cost_code("B", None, Some("A"))],
            ))
            .await
            .unwrap();
        // One read for partitioning, then one refresh each for levels 1 and 2.
        assert_eq!(*repository.configuration_reads.lock().unwrap(), 3);
        assert_eq!(
            repository.configuration_by_number("B").unwrap().parent_cost_code_id,
            Some(repository.configuration_by_number("A").unwrap().id)
        );
    }

    #[tokio::test]
    async fn test_non_text_cell_only_rejects_its_row() {
        let (repository, service) = setup();
        let request: CostCodeImportRequest = serde_json::from_str(
            r#"{
                "corporation_uuid": "corp-1",
                "divisions": [
                    {"division_number": "01", "division_name": "General", "division_order": 1},
                    {"division_number": {"code": "02"}, "division_name": "Site", "division_order": 2}
                ],
                "configurations": [
                    {"cost_code_number": "01010", "cost_code_name": "Mobilization"},
                    {"cost_code_number": "01020", "cost_code_name": ["Mobilization"]}
                ]
            }"#,
        )
        .unwrap();

        let response = service.import_cost_codes(request).await.unwrap();
        assert_eq!(response.data.divisions.new_count, 1);
        assert_eq!(
            response.data.divisions.errors,
            vec!["Division row 2: Expected text for field(s): division_number".to_string()]
        );
        assert_eq!(response.data.configurations.new_count, 1);
        assert_eq!(
            response.data.configurations.errors,
            vec!["Cost code 01020: Expected text for field(s): cost_code_name".to_string()]
        );
        assert!(repository.configuration_by_number("01010").is_some());
        assert!(repository.configuration_by_number("01020").is_none());
    }

    #[tokio::test]
    async fn test_unknown_division_is_row_error() {
        let (_, service) = setup();
        let response = service
            .import_cost_codes(request(
                vec![division("01", "General", 1)],
                vec![
                    cost_code("01010", Some("01"), None),
                    cost_code("02010", Some("02"), None),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 1);
        assert_eq!(
            response.data.configurations.errors,
            vec!["Cost code 02010: Division '02' not found".to_string()]
        );
    }

    #[tokio::test]
    async fn test_division_resolved_from_earlier_call() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(vec![division("03", "Concrete", 3)], vec![]))
            .await
            .unwrap();
        let response = service
            .import_cost_codes(request(vec![], vec![cost_code("03100", Some("03"), None)]))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 1);
        let concrete = repository.division_by_number("03").unwrap();
        assert_eq!(
            repository
                .configuration_by_number("03100")
                .unwrap()
                .division_id,
            Some(concrete.id)
        );
    }

    #[tokio::test]
    async fn test_duplicate_cost_code_within_batch() {
        let (repository, service) = setup();
        let response = service
            .import_cost_codes(request(
                vec![],
                vec![cost_code("01010", None, None), cost_code("01010", None, None)],
            ))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 1);
        assert_eq!(response.data.configurations.duplicates, 1);
        assert_eq!(response.data.configurations.total, 2);
        assert_eq!(repository.configurations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_stop_the_batch() {
        let (repository, service) = setup();
        repository.fail_insert_of("02");
        repository.fail_insert_of("01020");

        let response = service
            .import_cost_codes(request(
                vec![
                    division("01", "General", 1),
                    division("02", "Site Work", 2),
                    division("03", "Concrete", 3),
                ],
                vec![
                    cost_code("01010", Some("01"), None),
                    cost_code("01020", Some("01"), None),
                    cost_code("01030", Some("01"), None),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.data.divisions.new_count, 2);
        assert_eq!(response.data.divisions.errors.len(), 1);
        assert!(response.data.divisions.errors[0].starts_with("Division 02: "));
        assert_eq!(response.data.configurations.new_count, 2);
        assert_eq!(response.data.configurations.errors.len(), 1);
        assert!(response.data.configurations.errors[0].starts_with("Cost code 01020: "));
    }

    #[tokio::test]
    async fn test_invalid_rows_use_position_label() {
        let (_, service) = setup();
        let response = service
            .import_cost_codes(request(
                vec![DivisionImportRow {
                    division_name: Some("Nameless".to_string()),
                    division_order: Some(OrderValue::Number(1)),
                    ..Default::default()
                }],
                vec![
                    cost_code("01010", None, None),
                    CostCodeImportRow {
                        cost_code_name: None,
                        ..cost_code("01020", None, None)
                    },
                    CostCodeImportRow {
                        order: Some(OrderValue::Invalid("first".to_string())),
                        ..cost_code("01030", None, None)
                    },
                ],
            ))
            .await
            .unwrap();

        assert_eq!(
            response.data.divisions.errors,
            vec!["Division row 1: Missing required field(s): division_number".to_string()]
        );
        assert_eq!(
            response.data.configurations.errors,
            vec![
                "Cost code 01020: Missing required field(s): cost_code_name".to_string(),
                "Cost code 01030: Order must be a whole number, got 'first'".to_string(),
            ]
        );
        assert_eq!(response.data.configurations.new_count, 1);
    }

    #[tokio::test]
    async fn test_gl_account_assignment() {
        let (repository, service) = setup();
        repository.insert_gl_account(CORP, "5000", false);
        repository.insert_gl_account(CORP, "5100", true);

        service
            .import_cost_codes(request(vec![], vec![cost_code("01010", None, None)]))
            .await
            .unwrap();
        assert_eq!(
            repository
                .configuration_by_number("01010")
                .unwrap()
                .gl_account_id
                .as_deref(),
            Some("gl-5100")
        );
    }

    #[tokio::test]
    async fn test_gl_account_failure_is_not_fatal() {
        let (repository, service) = setup();
        *repository.fail_gl_accounts.lock().unwrap() = true;

        let response = service
            .import_cost_codes(request(vec![], vec![cost_code("01010", None, None)]))
            .await
            .unwrap();
        assert_eq!(response.data.configurations.new_count, 1);
        assert_eq!(
            repository
                .configuration_by_number("01010")
                .unwrap()
                .gl_account_id,
            None
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_is_fatal() {
        let (repository, _) = setup();
        *repository.fail_divisions.lock().unwrap() = true;

        let importer = CostCodeImporter::new(&repository, CORP);
        let result = importer
            .run(&[division("01", "General", 1)], &[])
            .await;
        assert!(matches!(result, Err(Error::Database(_))));
        *repository.fail_divisions.lock().unwrap() = false;
        assert!(repository.division_by_number("01").is_none());
    }

    #[tokio::test]
    async fn test_missing_corporation_is_rejected() {
        let (repository, service) = setup();
        for corporation_uuid in [None, Some("   ".to_string())] {
            let result = service
                .import_cost_codes(CostCodeImportRequest {
                    corporation_uuid,
                    divisions: vec![division("01", "General", 1)],
                    configurations: vec![],
                })
                .await;
            assert!(matches!(
                result,
                Err(Error::Validation(ValidationError::MissingField(_)))
            ));
        }
        assert!(repository.divisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (_, service) = setup();
        let response = service
            .import_cost_codes(request(vec![], vec![]))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.data.divisions.total, 0);
        assert_eq!(response.data.configurations.total, 0);
    }

    #[tokio::test]
    async fn test_corporations_are_isolated() {
        let (repository, service) = setup();
        service
            .import_cost_codes(request(vec![division("01", "General", 1)], vec![]))
            .await
            .unwrap();

        let response = service
            .import_cost_codes(CostCodeImportRequest {
                corporation_uuid: Some("corp-2".to_string()),
                divisions: vec![division("01", "General", 1)],
                configurations: vec![cost_code("01010", Some("01"), None)],
            })
            .await
            .unwrap();
        assert_eq!(response.data.divisions.new_count, 1);
        assert_eq!(response.data.configurations.new_count, 1);

        let corp_two_division = repository
            .divisions
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.corporation_uuid == "corp-2")
            .cloned()
            .unwrap();
        assert_eq!(
            repository
                .configuration_by_number("01010")
                .unwrap()
                .division_id,
            Some(corp_two_division.id)
        );
    }

    #[test]
    fn test_request_requires_row_arrays() {
        let missing: serde_json::Result<CostCodeImportRequest> =
            serde_json::from_str(r#"{"corporation_uuid":"corp-1","divisions":[]}"#);
        assert!(missing.is_err());

        let loose: CostCodeImportRequest = serde_json::from_str(
            r#"{
                "corporationUuid": "corp-1",
                "divisions": [{"division_number": 1, "division_name": "General", "division_order": "2"}],
                "configurations": [{"cost_code_number": "01010", "cost_code_name": "Mob", "order": 1.0, "parent_cost_code_number": ""}]
            }"#,
        )
        .unwrap();
        assert_eq!(loose.corporation_uuid.as_deref(), Some("corp-1"));
        assert_eq!(loose.divisions[0].division_number.as_deref(), Some("1"));
        assert_eq!(loose.divisions[0].division_order, Some(OrderValue::Number(2)));
        assert_eq!(loose.configurations[0].order, Some(OrderValue::Number(1)));
        assert_eq!(loose.configurations[0].parent_cost_code_number, None);
    }
}
