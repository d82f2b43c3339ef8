use super::normalizer::fold_header;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Logical columns the importers understand, independent of export spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    OrderNumber,
    DriverName,
    Hub,
    Phone,
    AlternatePhone,
    Status,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::OrderNumber,
        LogicalField::DriverName,
        LogicalField::Hub,
        LogicalField::Phone,
        LogicalField::AlternatePhone,
        LogicalField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogicalField::OrderNumber => "order_number",
            LogicalField::DriverName => "driver_name",
            LogicalField::Hub => "hub",
            LogicalField::Phone => "phone",
            LogicalField::AlternatePhone => "alternate_phone",
            LogicalField::Status => "status",
        }
    }

    fn index(&self) -> usize {
        match self {
            LogicalField::OrderNumber => 0,
            LogicalField::DriverName => 1,
            LogicalField::Hub => 2,
            LogicalField::Phone => 3,
            LogicalField::AlternatePhone => 4,
            LogicalField::Status => 5,
        }
    }

    /// Accepted spellings, most specific first. Comparison happens on folded text.
    pub fn aliases(&self) -> &'static [String] {
        &folded_aliases()[self.index()]
    }
}

fn folded_aliases() -> &'static [Vec<String>; 6] {
    static FOLDED: OnceLock<[Vec<String>; 6]> = OnceLock::new();
    FOLDED.get_or_init(|| {
        const ORDER_NUMBER: &[&str] = &[
            "Número do Pedido",
            "Numero Pedido",
            "Nº Pedido",
            "N° Pedido",
            "Pedido",
            "ID Pedido",
            "order_number",
            "Order ID",
            "Order",
        ];
        const DRIVER_NAME: &[&str] = &[
            "driver_name",
            "Nome do Motorista",
            "Nome Motorista",
            "Motorista",
            "Entregador",
            "Nome Entregador",
            "Driver",
            "Nome",
        ];
        const HUB: &[&str] = &[
            "hub",
            "Base",
            "Código Base",
            "Cod Base",
            "Código da Base",
            "Base Code",
            "Unidade",
            "Filial",
        ];
        const PHONE: &[&str] = &["phone", "Telefone", "Celular", "Fone", "Tel", "Telefone 1"];
        const ALTERNATE_PHONE: &[&str] = &[
            "alternate_phone",
            "Telefone 2",
            "Telefone Alternativo",
            "WhatsApp",
            "Contato",
            "Phone 2",
        ];
        const STATUS: &[&str] = &["status", "Situação", "Status Cadastro", "Aprovação"];

        let fold = |aliases: &[&str]| -> Vec<String> {
            aliases.iter().map(|alias| fold_header(alias)).collect()
        };
        [
            fold(ORDER_NUMBER),
            fold(DRIVER_NAME),
            fold(HUB),
            fold(PHONE),
            fold(ALTERNATE_PHONE),
            fold(STATUS),
        ]
    })
}

/// Column positions resolved for one input shape (a header row or a key set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLayout {
    positions: [Option<usize>; 6],
}

impl FieldLayout {
    /// Resolves every logical field against the given headers. For each
    /// field the earliest alias present wins, regardless of column order.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let folded: Vec<String> = headers.iter().map(|h| fold_header(h.as_ref())).collect();
        let mut positions = [None; 6];

        for field in LogicalField::ALL {
            positions[field.index()] = field
                .aliases()
                .iter()
                .find_map(|alias| folded.iter().position(|header| header == alias));
        }

        Self { positions }
    }

    pub fn position(&self, field: LogicalField) -> Option<usize> {
        self.positions[field.index()]
    }
}

/// Memoizes layouts per distinct key set so that a batch of objects sharing
/// a shape resolves its aliases once.
#[derive(Debug, Default)]
pub struct FieldResolver {
    layouts: HashMap<Vec<String>, FieldLayout>,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// `keys` must be in a stable order for the same shape; callers pass
    /// sorted object keys.
    pub fn layout_for(&mut self, keys: &[String]) -> &FieldLayout {
        if !self.layouts.contains_key(keys) {
            self.layouts
                .insert(keys.to_vec(), FieldLayout::resolve(keys));
        }
        &self.layouts[keys]
    }

    pub fn cached_shapes(&self) -> usize {
        self.layouts.len()
    }
}
