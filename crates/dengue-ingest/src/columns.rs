//! Canonical column names of the SSA case files.
//!
//! Headers are normalized to uppercase on read, so a file using
//! lowercase or BOM-prefixed headers still matches these constants.

/// Residence state code (INEGI, 1-32; 97-99 unspecified/foreign).
pub const ENTIDAD_RES: &str = "ENTIDAD_RES";
/// Residence municipality code within the state.
pub const MUNICIPIO_RES: &str = "MUNICIPIO_RES";
/// Sex code (1 mujer, 2 hombre).
pub const SEXO: &str = "SEXO";
/// Age in completed years.
pub const EDAD_ANOS: &str = "EDAD_ANOS";
/// Symptom onset date, day-first.
pub const FECHA_SIGN_SINTOMAS: &str = "FECHA_SIGN_SINTOMAS";
/// Case classification (1 probable, 2 confirmed, 3 discarded).
pub const ESTATUS_CASO: &str = "ESTATUS_CASO";
/// RT-PCR serotype result (1-4 DENV, 5 not isolated).
pub const RESULTADO_PCR: &str = "RESULTADO_PCR";
/// Death committee verdict (1 confirmed dengue death).
pub const DICTAMEN: &str = "DICTAMEN";

/// Columns every analysis needs; validation rejects files missing any.
pub const REQUIRED: [&str; 8] = [
    ENTIDAD_RES,
    MUNICIPIO_RES,
    SEXO,
    EDAD_ANOS,
    FECHA_SIGN_SINTOMAS,
    ESTATUS_CASO,
    RESULTADO_PCR,
    DICTAMEN,
];
