//! PostgreSQL backend integration tests.
//!
//! Configuration tests run without a server. The `postgres_integration`
//! module starts a PostgreSQL container with testcontainers, creates the
//! tables of a handful of built-in collections and drives the generic
//! statements against them.
//!
//! Run with: `cargo test -p sisbase-persistence --features postgres -- postgres`

#![cfg(feature = "postgres")]

use sisbase_persistence::backends::postgres::{PostgresConfig, PostgresSslMode};

// ============================================================================
// Configuration Tests (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_postgres_config_defaults() {
    let config = PostgresConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
    assert_eq!(config.dbname, "sisbase");
    assert_eq!(config.user, "postgres");
    assert!(config.password.is_none());
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.statement_timeout_ms, 30000);
    assert_eq!(config.connect_retries, 3);
}

#[test]
fn test_postgres_config_serialization() {
    let config = PostgresConfig {
        host: "pg-server".to_string(),
        port: 5433,
        password: Some("secret".to_string()),
        ssl_mode: PostgresSslMode::Require,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: PostgresConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.host, "pg-server");
    assert_eq!(deserialized.port, 5433);
    assert_eq!(deserialized.password.as_deref(), Some("secret"));
    assert_eq!(deserialized.ssl_mode, PostgresSslMode::Require);
}

#[test]
fn test_postgres_config_partial_json_uses_defaults() {
    let config: PostgresConfig = serde_json::from_str(r#"{"host": "db"}"#).unwrap();
    assert_eq!(config.host, "db");
    assert_eq!(config.port, 5432);
    assert_eq!(config.connect_retry_delay_ms, 200);
}

#[test]
fn test_postgres_config_debug_hides_password() {
    let config = PostgresConfig {
        password: Some("hunter2".to_string()),
        ..Default::default()
    };
    let debug = format!("{:?}", config);
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("***"));
}

// ============================================================================
// Integration Tests (requires Docker for testcontainers)
// ============================================================================

/// Integration tests against a real PostgreSQL instance.
///
/// Each test writes to its own tables or uses keys no other test touches, so
/// the shared database needs no cleanup between tests.
///
/// Skip if no Docker:
///   cargo test -p sisbase-persistence --features postgres -- --skip postgres_integration
#[cfg(test)]
mod postgres_integration {
    use serde_json::{Value, json};

    use sisbase_persistence::backends::postgres::{PostgresBackend, PostgresConfig, PostgresSslMode};
    use sisbase_persistence::error::{BackendError, StorageError};
    use sisbase_persistence::schema::{EntityRegistry, EntitySchema, ReadSource};
    use sisbase_persistence::search::{SearchPlan, SearchRequest};
    use sisbase_persistence::types::{PaginationPolicy, Record, RecordInput};
    use sisbase_persistence::{EnrichmentResolver, EntityStore, ViewBackedReader};

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::OnceCell;

    const DDL: &str = r#"
        CREATE TABLE personap (
            id BIGSERIAL PRIMARY KEY,
            documento BIGINT,
            nombre1 TEXT, nombre2 TEXT, apellido1 TEXT, apellido2 TEXT,
            telefono TEXT, celular TEXT
        );
        CREATE TABLE personas (
            id BIGSERIAL PRIMARY KEY,
            nombre TEXT, contacto TEXT, ci NUMERIC, tel TEXT, fax TEXT, cel TEXT
        );
        CREATE TABLE abogados (
            id BIGSERIAL PRIMARY KEY,
            cedula NUMERIC, nombres TEXT, apellidos TEXT, telefono TEXT, ciudad TEXT
        );
        CREATE TABLE itaipu (
            cedula NUMERIC PRIMARY KEY,
            nombre TEXT, cargo TEXT, ubicacion TEXT, salario NUMERIC
        );
        CREATE VIEW itaipu_detalles_view AS
            SELECT cedula, nombre, cargo, salario FROM itaipu;
        CREATE TABLE politicos (
            id BIGSERIAL PRIMARY KEY,
            nombres TEXT, apellidos TEXT, partido TEXT, cedula TEXT, telefono TEXT
        );
        CREATE TABLE medicos (
            id BIGSERIAL PRIMARY KEY,
            cedula NUMERIC, nombre TEXT, registro TEXT, telefono TEXT
        );
    "#;

    /// Shared PostgreSQL container reused across all tests in this module.
    struct SharedPg {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<Postgres>,
    }

    static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

    async fn shared_pg() -> &'static SharedPg {
        SHARED_PG
            .get_or_init(|| async {
                let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
                let container = Postgres::default()
                    .with_label("github.run_id", &run_id)
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");

                let port = container
                    .get_host_port_ipv4(5432)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                let url = format!("host={host} port={port} user=postgres password=postgres dbname=postgres");
                let (client, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls)
                    .await
                    .expect("Failed to connect for DDL");
                tokio::spawn(connection);
                client
                    .batch_execute(DDL)
                    .await
                    .expect("Failed to create tables");

                SharedPg {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    async fn create_backend() -> PostgresBackend {
        let pg = shared_pg().await;
        let config = PostgresConfig {
            host: pg.host.clone(),
            port: pg.port,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: Some("postgres".to_string()),
            ssl_mode: PostgresSslMode::Disable,
            max_connections: 5,
            ..Default::default()
        };

        PostgresBackend::new(config)
            .await
            .expect("Failed to create PostgresBackend")
    }

    fn registry() -> EntityRegistry {
        EntityRegistry::builtin().unwrap()
    }

    async fn insert(backend: &PostgresBackend, schema: &EntitySchema, body: Value) -> Record {
        let input = RecordInput::for_create(schema, &body).unwrap();
        backend.create(schema, &input).await.unwrap()
    }

    async fn search(
        backend: &PostgresBackend,
        schema: &EntitySchema,
        query: Option<&str>,
    ) -> Vec<Record> {
        let request = SearchRequest {
            query: query.map(str::to_string),
            ..Default::default()
        };
        let plan = SearchPlan::build(&schema.search, &request, &PaginationPolicy::default());
        backend
            .search(ReadSource::Table(schema), &plan)
            .await
            .unwrap()
    }

    fn key_of(record: &Record, field: &str) -> String {
        record[field].to_string()
    }

    // ========================================================================
    // CRUD Tests
    // ========================================================================

    #[tokio::test]
    async fn postgres_integration_health_check() {
        let backend = create_backend().await;
        assert_eq!(backend.backend_name(), "postgres");
        backend.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn postgres_integration_crud_lifecycle() {
        let backend = create_backend().await;
        let registry = registry();
        let abogados = registry.get("abogados").unwrap();

        let created = insert(
            &backend,
            abogados,
            json!({"cedula": "0081234", "nombres": "Ana", "apellidos": "Gómez", "telefono": "0981"}),
        )
        .await;
        assert_eq!(created["cedula"], json!(81234));
        let id = key_of(&created, "id");

        let fetched = backend.get_by_key(abogados, &id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let update = RecordInput::for_update(
            abogados,
            &json!({"cedula": 81234, "nombres": "Ana María", "apellidos": "Gómez"}),
        )
        .unwrap();
        let updated = backend.update(abogados, &id, &update).await.unwrap().unwrap();
        assert_eq!(updated["nombres"], json!("Ana María"));
        assert!(updated["telefono"].is_null());

        let deleted = backend.delete(abogados, &id).await.unwrap().unwrap();
        assert_eq!(deleted["id"], created["id"]);
        assert!(backend.get_by_key(abogados, &id).await.unwrap().is_none());
        assert!(backend.update(abogados, &id, &update).await.unwrap().is_none());
        assert!(backend.delete(abogados, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn postgres_integration_duplicate_natural_key() {
        let backend = create_backend().await;
        let registry = registry();
        let itaipu = registry.get("itaipu").unwrap();

        insert(&backend, itaipu, json!({"cedula": 5550001, "nombre": "Primero"})).await;

        let duplicate = RecordInput::for_create(itaipu, &json!({"cedula": "5550001"})).unwrap();
        let err = backend.create(itaipu, &duplicate).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::ConstraintViolation { .. })
        ));
    }

    // ========================================================================
    // Search Tests
    // ========================================================================

    #[tokio::test]
    async fn postgres_integration_tokenized_search() {
        let backend = create_backend().await;
        let registry = registry();
        let personap = registry.get("personap").unwrap();

        insert(
            &backend,
            personap,
            json!({"documento": 7100, "nombre1": "Qzjuan", "apellido1": "Pérez"}),
        )
        .await;
        insert(
            &backend,
            personap,
            json!({"documento": 7200, "nombre1": "QZJUANA", "apellido1": "Gómez"}),
        )
        .await;

        let rows = search(&backend, personap, Some("qzjuan")).await;
        assert_eq!(rows.len(), 2);

        let rows = search(&backend, personap, Some("QZJUAN pér")).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["documento"], json!(7100));

        let rows = search(&backend, personap, Some("7200")).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombre1"], json!("QZJUANA"));

        assert!(search(&backend, personap, None).await.is_empty());
    }

    #[tokio::test]
    async fn postgres_integration_search_folds_like_memory() {
        let backend = create_backend().await;
        let registry = registry();
        let personap = registry.get("personap").unwrap();

        insert(
            &backend,
            personap,
            json!({
                "documento": 7300,
                "nombre1": "Ñandú",
                "nombre2": "Gu\u{200B}araní",
                "apellido1": "Pérez",
                "apellido2": "Straße"
            }),
        )
        .await;

        for term in ["ñandú", "ÑANDÚ pérez", "guaraní", "straße", "ñandú\u{00A0}straße"] {
            let rows = search(&backend, personap, Some(term)).await;
            assert!(
                rows.iter().any(|r| r["documento"] == json!(7300)),
                "term {term:?} should match"
            );
        }

        let rows = search(&backend, personap, Some("ñandú strasse")).await;
        assert!(rows.is_empty());
        let rows = search(&backend, personap, Some("nandu")).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn postgres_integration_long_numeric_key_round_trip() {
        let backend = create_backend().await;
        let registry = registry();
        let itaipu = registry.get("itaipu").unwrap();
        let cedula = "987654321098765432109876543210";

        let created = insert(&backend, itaipu, json!({"cedula": cedula, "nombre": "Largo"})).await;
        assert_eq!(created["cedula"].to_string(), cedula);

        let fetched = backend.get_by_key(itaipu, cedula).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let rows = search(&backend, itaipu, Some(cedula)).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombre"], json!("Largo"));
    }

    #[tokio::test]
    async fn postgres_integration_exact_numeric_search() {
        let backend = create_backend().await;
        let registry = registry();
        let abogados = registry.get("abogados").unwrap();

        insert(&backend, abogados, json!({"cedula": 9191, "nombres": "Exacto"})).await;

        let rows = search(&backend, abogados, Some("0009191")).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombres"], json!("Exacto"));

        let rows = search(&backend, abogados, Some("123456789012345678901234567890")).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn postgres_integration_full_text_search() {
        let backend = create_backend().await;
        let registry = registry();
        let politicos = registry.get("politicos").unwrap();

        insert(
            &backend,
            politicos,
            json!({"nombres": "Evaristo", "apellidos": "Zárate", "partido": "Encuentro"}),
        )
        .await;

        let rows = search(&backend, politicos, Some("evaristo zárate")).await;
        assert_eq!(rows.len(), 1);

        let rows = search(&backend, politicos, Some("encuentro")).await;
        assert_eq!(rows.len(), 1);

        let rows = search(&backend, politicos, Some("evaristo encuentro")).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn postgres_integration_completeness_ordering() {
        let backend = create_backend().await;
        let registry = registry();
        let medicos = registry.get("medicos").unwrap();

        insert(&backend, medicos, json!({"nombre": "Ana", "telefono": null})).await;
        insert(&backend, medicos, json!({"nombre": "Bruno", "telefono": "  "})).await;
        insert(&backend, medicos, json!({"nombre": "Zulma", "telefono": "0981"})).await;

        let rows = search(&backend, medicos, None).await;
        let names: Vec<_> = rows.iter().map(|r| r["nombre"].clone()).collect();
        assert_eq!(names, vec![json!("Zulma"), json!("Ana"), json!("Bruno")]);
    }

    #[tokio::test]
    async fn postgres_integration_view_reader() {
        let backend = create_backend().await;
        let registry = registry();
        let itaipu = registry.get("itaipu").unwrap();
        let view = itaipu.view("detalles").unwrap();

        insert(
            &backend,
            itaipu,
            json!({"cedula": 6660001, "nombre": "Vista Uno", "cargo": "Técnico"}),
        )
        .await;

        let reader = ViewBackedReader::new(&backend, itaipu, view);
        let rows = reader
            .read(&SearchRequest::with_query("6660001"), &PaginationPolicy::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["cargo"], json!("Técnico"));
        assert!(rows[0].get("ubicacion").is_none());
    }

    // ========================================================================
    // Enrichment Tests
    // ========================================================================

    #[tokio::test]
    async fn postgres_integration_enrichment() {
        let backend = create_backend().await;
        let registry = registry();
        let personap = registry.get("personap").unwrap();
        let personas = registry.get("personas").unwrap();
        let politicos = registry.get("politicos").unwrap();

        insert(&backend, personap, json!({"documento": 8800, "telefono": "021-555"})).await;
        insert(&backend, personas, json!({"ci": 8800, "tel": " 0981-222 "})).await;
        let created = insert(&backend, politicos, json!({"nombres": "Rosa", "cedula": "8800"})).await;
        let id = key_of(&created, "id");

        let resolver = EnrichmentResolver::new(&backend, &registry);
        let mut input =
            RecordInput::for_update(politicos, &json!({"nombres": "Rosa", "cedula": "8800"}))
                .unwrap();
        resolver.apply(politicos, &mut input).await.unwrap();

        let updated = backend.update(politicos, &id, &input).await.unwrap().unwrap();
        assert_eq!(updated["telefono"], json!("021-555, 0981-222"));
    }
}
