//! Table layouts of the data directory

use taller_store::{LegacyLayout, Schema};

pub static USERS: Schema = Schema {
    name: "usuarios",
    columns: &["username", "password", "suspended", "admin"],
    legacy: &[
        LegacyLayout {
            columns: &["username", "password"],
            mapping: &[Some(0), Some(1), None, None],
        },
        LegacyLayout {
            columns: &["username", "password", "suspended"],
            mapping: &[Some(0), Some(1), Some(2), None],
        },
    ],
};

pub static CLIENTS: Schema = Schema {
    name: "clientes",
    columns: &["NombreCliente", "EmailCliente", "Telefono"],
    legacy: &[],
};

pub static VEHICLES: Schema = Schema {
    name: "vehiculos",
    columns: &[
        "Idauto",
        "Patente",
        "Marca",
        "Modelo",
        "Kilometraje",
        "TipoAceite",
        "Fecha",
    ],
    legacy: &[
        LegacyLayout {
            columns: &[
                "VehiculoId",
                "Marca",
                "Modelo",
                "Patente",
                "TipoAceite",
                "Kilometraje",
            ],
            mapping: &[Some(0), Some(3), Some(1), Some(2), Some(5), Some(4), None],
        },
        LegacyLayout {
            columns: &["Idauto", "Patente", "Marca", "Modelo"],
            mapping: &[Some(0), Some(1), Some(2), Some(3), None, None, None],
        },
    ],
};

pub static MESSAGES: Schema = Schema {
    name: "mensajes",
    columns: &[
        "Id",
        "Remitente",
        "Destinatario",
        "Asunto",
        "Mensaje",
        "Fecha",
        "Leido",
        "BorradoRemitente",
        "BorradoDestinatario",
    ],
    legacy: &[],
};

