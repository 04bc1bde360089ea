pub(crate) mod check_header;
pub(crate) mod decode_version;
pub(crate) mod default_params;
pub(crate) mod expected_index;
