use studyhub_core::*;
use url::Url;

async fn store() -> Store {
    let store = Store::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    store
}

fn new_study(title: &str) -> NewStudy {
    NewStudy {
        title: title.to_string(),
        description: format!("{title} description"),
    }
}

fn new_assay(measurement_type: &str, study_id: i64) -> NewAssay {
    NewAssay {
        measurement_type: measurement_type.to_string(),
        study_id,
    }
}

#[tokio::test]
async fn test_create_and_get_study_with_assays() {
    let store = store().await;

    let created = store.create_study(new_study("Cohort A")).await.unwrap();
    assert!(created.assays.is_empty());
    let id = created.study.id;

    store.create_assay(new_assay("proteomics", id)).await.unwrap();
    store.create_assay(new_assay("metabolomics", id)).await.unwrap();

    let detail = store.studies().get(id).await.unwrap();
    assert_eq!(detail.study.title, "Cohort A");
    assert_eq!(detail.assays.len(), 2);
    assert!(detail.assays.iter().all(|a| a.study_id == id));
    assert_eq!(detail.assays[0].measurement_type, "proteomics");
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let store = store().await;

    let err = store.studies().get(42).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { resource: "study", .. }));

    let err = store.assays().get(42).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { resource: "assay", .. }));

    let err = store.delete_study(42).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_replace_checks_the_matching_table() {
    let store = store().await;
    let study = store.create_study(new_study("Cohort A")).await.unwrap();

    // study 1 exists but assay 1 does not
    let err = store
        .replace_assay(study.study.id, new_assay("proteomics", study.study.id))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { resource: "assay", .. }));

    let assay = store
        .create_assay(new_assay("proteomics", study.study.id))
        .await
        .unwrap();
    let err = store
        .replace_study(assay.id + 1, new_study("Cohort B"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { resource: "study", .. }));
}

#[tokio::test]
async fn test_assay_requires_existing_study() {
    let store = store().await;

    let err = store.create_assay(new_assay("rna-seq", 5)).await.unwrap_err();
    let CoreError::Validation(fields) = err else {
        panic!("expected validation error");
    };
    assert_eq!(fields[0].field, "study");
    assert_eq!(
        fields[0].message,
        "Invalid pk \"5\" - object does not exist."
    );
}

#[tokio::test]
async fn test_deleting_study_cascades_to_assays() {
    let store = store().await;

    let keep = store.create_study(new_study("Keep")).await.unwrap().study.id;
    let doomed = store.create_study(new_study("Drop")).await.unwrap().study.id;
    store.create_assay(new_assay("a", keep)).await.unwrap();
    store.create_assay(new_assay("b", doomed)).await.unwrap();
    store.create_assay(new_assay("c", doomed)).await.unwrap();

    store.delete_study(doomed).await.unwrap();

    assert_eq!(store.studies().count().await.unwrap(), 1);
    let remaining = store.assays().all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].study_id, keep);
}

#[tokio::test]
async fn test_partial_and_full_updates() {
    let store = store().await;
    let id = store.create_study(new_study("Before")).await.unwrap().study.id;

    let updated = store
        .update_study(
            id,
            StudyChanges {
                title: Some("After".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.study.title, "After");
    assert_eq!(updated.study.description, "Before description");

    let replaced = store
        .replace_study(
            id,
            NewStudy {
                title: "Replaced".to_string(),
                description: "New".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.study.description, "New");

    let err = store.replace_study(id + 1, new_study("x")).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_assay_can_move_between_studies() {
    let store = store().await;
    let first = store.create_study(new_study("First")).await.unwrap().study.id;
    let second = store.create_study(new_study("Second")).await.unwrap().study.id;
    let assay = store.create_assay(new_assay("imaging", first)).await.unwrap();

    let moved = store
        .update_assay(
            assay.id,
            AssayChanges {
                measurement_type: None,
                study_id: Some(second),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.study_id, second);
    assert_eq!(moved.measurement_type, "imaging");

    assert!(store.studies().get(first).await.unwrap().assays.is_empty());
    assert_eq!(store.studies().get(second).await.unwrap().assays.len(), 1);
}

#[tokio::test]
async fn test_paginated_studies_include_nested_assays() {
    let store = store().await;
    for n in 0..5 {
        let id = store
            .create_study(new_study(&format!("Study {n}")))
            .await
            .unwrap()
            .study
            .id;
        store.create_assay(new_assay("genomics", id)).await.unwrap();
    }

    let pagination = PageNumberPagination::new(2, 10);
    let params = PageParams {
        page: Some("2".to_string()),
        page_size: None,
    };
    let url = Url::parse("http://localhost/studies/?page=2").unwrap();
    let page = pagination
        .paginate_queryset(&store.studies(), &params, &url)
        .await
        .unwrap();

    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    let titles: Vec<_> = page.records.iter().map(|d| d.study.title.as_str()).collect();
    assert_eq!(titles, ["Study 2", "Study 3"]);
    assert!(page.records.iter().all(|d| d.assays.len() == 1));
}
