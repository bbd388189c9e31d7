//! Built-in collections served by SisBase.

use super::{
    Column, EmptyQueryPolicy, EnrichmentRule, EntitySchema, KeyColumn, LookupSource,
    SearchProfile, ViewSchema,
};

const ID: KeyColumn = KeyColumn {
    column: Column::bigint("id"),
    natural: false,
};

const CEDULA_KEY: KeyColumn = KeyColumn {
    column: Column::numeric("cedula"),
    natural: true,
};

const PERSONAP_FIELDS: &[Column] = &[
    Column::bigint("documento"),
    Column::text("nombre1"),
    Column::text("nombre2"),
    Column::text("apellido1"),
    Column::text("apellido2"),
    Column::text("telefono"),
    Column::text("celular"),
];

const PERSONAP: EntitySchema = EntitySchema {
    name: "personap",
    table: "personap",
    key: ID,
    fields: PERSONAP_FIELDS,
    search: SearchProfile {
        exact_column: Some(Column::bigint("documento")),
        ..SearchProfile::tokenized(
            &[
                Column::text("nombre1"),
                Column::text("nombre2"),
                Column::text("apellido1"),
                Column::text("apellido2"),
            ],
            "id",
        )
    },
    views: &[],
    enrichment: None,
};

const PERSONAS: EntitySchema = EntitySchema {
    name: "personas",
    table: "personas",
    key: ID,
    fields: &[
        Column::text("nombre"),
        Column::text("contacto"),
        Column::numeric("ci"),
        Column::text("tel"),
        Column::text("fax"),
        Column::text("cel"),
    ],
    search: SearchProfile {
        exact_column: Some(Column::numeric("ci")),
        ..SearchProfile::tokenized(&[Column::text("nombre"), Column::text("contacto")], "nombre")
    },
    views: &[],
    enrichment: None,
};

const INDUSTRIAS: EntitySchema = EntitySchema {
    name: "industrias",
    table: "industrias",
    key: ID,
    fields: &[
        Column::text("razon_social"),
        Column::text("telefonos"),
        Column::text("email"),
        Column::text("actividad"),
        Column::text("direccion"),
        Column::text("departamento"),
        Column::text("ciudad"),
    ],
    search: SearchProfile {
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        default_limit: 50,
        ..SearchProfile::tokenized(
            &[
                Column::text("razon_social"),
                Column::text("actividad"),
                Column::text("departamento"),
                Column::text("ciudad"),
            ],
            "razon_social",
        )
    },
    views: &[],
    enrichment: None,
};

const ABOGADOS: EntitySchema = EntitySchema {
    name: "abogados",
    table: "abogados",
    key: ID,
    fields: &[
        Column::numeric("cedula"),
        Column::text("nombres"),
        Column::text("apellidos"),
        Column::text("telefono"),
        Column::text("ciudad"),
    ],
    search: SearchProfile {
        query_param: "query",
        exact_column: Some(Column::numeric("cedula")),
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        ..SearchProfile::tokenized(&[Column::text("nombres"), Column::text("apellidos")], "id")
    },
    views: &[],
    enrichment: None,
};

const DETALLES_PROFILE: SearchProfile = SearchProfile {
    exact_column: Some(Column::numeric("cedula")),
    empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
    ..SearchProfile::tokenized(&[Column::text("nombre")], "nombre")
};

const ITAIPU: EntitySchema = EntitySchema {
    name: "itaipu",
    table: "itaipu",
    key: CEDULA_KEY,
    fields: &[
        Column::text("nombre"),
        Column::text("cargo"),
        Column::text("ubicacion"),
        Column::numeric("salario"),
    ],
    search: SearchProfile {
        exact_column: Some(Column::numeric("cedula")),
        ..SearchProfile::tokenized(&[Column::text("nombre")], "nombre")
    },
    views: &[ViewSchema {
        segment: "detalles",
        relation: "itaipu_detalles_view",
        profile: DETALLES_PROFILE,
    }],
    enrichment: None,
};

const YACYRETA: EntitySchema = EntitySchema {
    name: "yacyreta",
    table: "yacyreta",
    key: CEDULA_KEY,
    fields: &[
        Column::text("nombre"),
        Column::numeric("salario"),
        Column::text("sede"),
    ],
    search: SearchProfile {
        query_param: "query",
        exact_column: Some(Column::numeric("cedula")),
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        ..SearchProfile::tokenized(
            &[Column::numeric("cedula"), Column::text("nombre")],
            "cedula",
        )
    },
    views: &[ViewSchema {
        segment: "detalles",
        relation: "yacyreta_detalles_mview",
        profile: DETALLES_PROFILE,
    }],
    enrichment: None,
};

const EST_RURALES: EntitySchema = EntitySchema {
    name: "est-rurales",
    table: "est_rurales",
    key: ID,
    fields: &[
        Column::text("razon_social"),
        Column::text("direccion"),
        Column::text("departamento"),
        Column::text("ciudad"),
        Column::text("telefono"),
        Column::text("email"),
    ],
    search: SearchProfile {
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        ..SearchProfile::tokenized(
            &[
                Column::text("razon_social"),
                Column::text("departamento"),
                Column::text("ciudad"),
            ],
            "razon_social",
        )
    },
    views: &[],
    enrichment: None,
};

const IMPORTADORES: EntitySchema = EntitySchema {
    name: "importadores",
    table: "importadores",
    key: ID,
    fields: &[
        Column::text("razon_social"),
        Column::text("telefono"),
        Column::text("email"),
    ],
    search: SearchProfile::tokenized(
        &[Column::text("razon_social"), Column::text("email")],
        "razon_social",
    ),
    views: &[],
    enrichment: None,
};

const EXPORTAGRICOLA: EntitySchema = EntitySchema {
    name: "exportagricola",
    table: "agricola",
    key: ID,
    fields: &[
        Column::text("propietario"),
        Column::text("operador"),
        Column::text("gerente"),
        Column::text("telefono"),
        Column::text("instalacion"),
        Column::text("departamento"),
        Column::text("ciudad"),
    ],
    search: SearchProfile::tokenized(
        &[
            Column::text("propietario"),
            Column::text("operador"),
            Column::text("departamento"),
            Column::text("ciudad"),
        ],
        "propietario",
    ),
    views: &[],
    enrichment: None,
};

const FUTBOLISTAS: EntitySchema = EntitySchema {
    name: "futbolistas",
    table: "futbolistas",
    key: ID,
    fields: &[
        Column::text("cedula"),
        Column::text("nombres"),
        Column::text("apellidos"),
        Column::text("posicion"),
        Column::text("telefono"),
    ],
    search: SearchProfile::full_text(
        &[
            &[Column::text("nombres"), Column::text("apellidos")],
            &[Column::text("posicion")],
        ],
        "apellidos",
    ),
    views: &[],
    enrichment: None,
};

const POLITICOS: EntitySchema = EntitySchema {
    name: "politicos",
    table: "politicos",
    key: ID,
    fields: &[
        Column::text("nombres"),
        Column::text("apellidos"),
        Column::text("partido"),
        Column::text("cedula"),
        Column::text("telefono"),
    ],
    search: SearchProfile::full_text(
        &[
            &[Column::text("nombres"), Column::text("apellidos")],
            &[Column::text("partido")],
        ],
        "apellidos",
    ),
    views: &[],
    enrichment: Some(EnrichmentRule {
        lookup_field: "cedula",
        target_field: "telefono",
        sources: &[
            LookupSource {
                entity: "personap",
                key_column: Column::bigint("documento"),
                value_field: "telefono",
            },
            LookupSource {
                entity: "personas",
                key_column: Column::numeric("ci"),
                value_field: "tel",
            },
        ],
        separator: ", ",
    }),
};

const MEDICOS: EntitySchema = EntitySchema {
    name: "medicos",
    table: "medicos",
    key: ID,
    fields: &[
        Column::numeric("cedula"),
        Column::text("nombre"),
        Column::text("registro"),
        Column::text("telefono"),
    ],
    search: SearchProfile {
        completeness_order_field: Some("telefono"),
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        ..SearchProfile::tokenized(&[Column::text("nombre"), Column::numeric("cedula")], "nombre")
    },
    views: &[],
    enrichment: None,
};

const DESPACHANTES: EntitySchema = EntitySchema {
    name: "despachantes",
    table: "despachantes",
    key: ID,
    fields: &[
        Column::numeric("cedula"),
        Column::text("nombre"),
        Column::text("telefono"),
    ],
    search: SearchProfile {
        completeness_order_field: Some("telefono"),
        empty_query_policy: EmptyQueryPolicy::ReturnDefaultPage,
        ..SearchProfile::tokenized(&[Column::text("nombre"), Column::numeric("cedula")], "nombre")
    },
    views: &[],
    enrichment: None,
};

const CONTRI_STA_RITA: EntitySchema = EntitySchema {
    name: "contri_sta_rita",
    table: "contri_sta_rita",
    key: ID,
    fields: &[
        Column::text("razon_social"),
        Column::text("representante"),
        Column::text("telefono"),
        Column::text("actividad"),
    ],
    search: SearchProfile::tokenized(
        &[
            Column::text("razon_social"),
            Column::text("representante"),
            Column::text("actividad"),
        ],
        "razon_social",
    ),
    views: &[],
    enrichment: None,
};

/// Returns the descriptors of every built-in collection.
pub fn builtin_schemas() -> Vec<EntitySchema> {
    vec![
        PERSONAP,
        PERSONAS,
        INDUSTRIAS,
        ABOGADOS,
        ITAIPU,
        YACYRETA,
        EST_RURALES,
        IMPORTADORES,
        EXPORTAGRICOLA,
        FUTBOLISTAS,
        POLITICOS,
        MEDICOS,
        DESPACHANTES,
        CONTRI_STA_RITA,
    ]
}
