use super::types::{ErrorCode, ErrorType};

pub const DUPLICATE_NAME: ErrorCode = ErrorCode {
    code: "E001",
    title: "DUPLICATE NAME",
    error_type: ErrorType::Compiler,
    message: "Duplicate binding: `{}` is already defined in this context.",
    hint: Some("Context names are single-assignment. Bind the new value under a different name."),
};

pub const UNRESOLVED_REFERENCE: ErrorCode = ErrorCode {
    code: "E002",
    title: "UNRESOLVED REFERENCE",
    error_type: ErrorType::Compiler,
    message: "I can't find a value named `{}`.",
    hint: Some("Bind it first: cx.define(\"{}\", ...)"),
};

pub const FORWARD_REFERENCE: ErrorCode = ErrorCode {
    code: "E003",
    title: "FORWARD REFERENCE",
    error_type: ErrorType::Compiler,
    message: "`{}` is referenced before it is bound.",
    hint: Some("Move the definition of `{}` above its first use."),
};

pub const CYCLIC_REFERENCE: ErrorCode = ErrorCode {
    code: "E004",
    title: "CYCLIC REFERENCE",
    error_type: ErrorType::Compiler,
    message: "`{}` refers to itself.",
    hint: Some("An op graph must be acyclic. Compute the value from names bound earlier."),
};

pub const SHADOWED_NAME: ErrorCode = ErrorCode {
    code: "E005",
    title: "SHADOWED NAME",
    error_type: ErrorType::Compiler,
    message: "Nested binding `{}` shadows a name from an enclosing context.",
    hint: Some("Names inside a branch must not collide with names visible outside it."),
};

pub const NO_ENCLOSING_CLASS: ErrorCode = ErrorCode {
    code: "E006",
    title: "NO ENCLOSING CLASS",
    error_type: ErrorType::Compiler,
    message: "`{}` refers to `$self` outside of a class.",
    hint: Some("Self references are only valid inside a method of a ClassDef."),
};

pub const UNKNOWN_MEMBER: ErrorCode = ErrorCode {
    code: "E007",
    title: "UNKNOWN MEMBER",
    error_type: ErrorType::Compiler,
    message: "Class `{}` has no field or method named `{}`.",
    hint: Some("Declare the field in `configure` or register the method on the ClassDef."),
};

pub const METHOD_KIND_MISMATCH: ErrorCode = ErrorCode {
    code: "E008",
    title: "METHOD KIND MISMATCH",
    error_type: ErrorType::Compiler,
    message: "`{}` is a {} method but is called with {}.",
    hint: None,
};

pub const UNADDRESSABLE_SUBJECT: ErrorCode = ErrorCode {
    code: "E009",
    title: "UNADDRESSABLE SUBJECT",
    error_type: ErrorType::Compiler,
    message: "Cannot call `{}` on an anonymous expression.",
    hint: Some("Bind the expression to a context name first, then call `{}` on the returned reference."),
};

pub const INVALID_NAME: ErrorCode = ErrorCode {
    code: "E010",
    title: "INVALID NAME",
    error_type: ErrorType::Compiler,
    message: "`{}` is not a valid name.",
    hint: Some("Names start with a letter or `_` and contain only letters, digits, `_` and `-`."),
};

pub const RESERVED_NAME: ErrorCode = ErrorCode {
    code: "E011",
    title: "RESERVED NAME",
    error_type: ErrorType::Compiler,
    message: "`{}` is reserved by the compiler.",
    hint: None,
};

pub const DUPLICATE_MEMBER: ErrorCode = ErrorCode {
    code: "E012",
    title: "DUPLICATE MEMBER",
    error_type: ErrorType::Compiler,
    message: "Class `{}` declares `{}` more than once.",
    hint: Some("Fields and methods share one namespace."),
};

pub const DUPLICATE_COLUMN: ErrorCode = ErrorCode {
    code: "E013",
    title: "DUPLICATE COLUMN",
    error_type: ErrorType::Schema,
    message: "Column `{}` is declared more than once.",
    hint: None,
};

pub const UNKNOWN_COLUMN: ErrorCode = ErrorCode {
    code: "E014",
    title: "UNKNOWN COLUMN",
    error_type: ErrorType::Schema,
    message: "`{}` refers to undeclared column `{}`.",
    hint: None,
};

pub const EMPTY_KEY: ErrorCode = ErrorCode {
    code: "E015",
    title: "EMPTY KEY",
    error_type: ErrorType::Schema,
    message: "{} schema has no key columns.",
    hint: Some("The first column group is the primary key and must not be empty."),
};

pub const EMPTY_INDEX: ErrorCode = ErrorCode {
    code: "E016",
    title: "EMPTY INDEX",
    error_type: ErrorType::Schema,
    message: "Index `{}` has no columns.",
    hint: None,
};

pub const INVALID_LINK: ErrorCode = ErrorCode {
    code: "E017",
    title: "INVALID LINK",
    error_type: ErrorType::Compiler,
    message: "`{}` is not a valid link: {}.",
    hint: None,
};

pub const UNORDERED_REMOTE_CALL: ErrorCode = ErrorCode {
    code: "E018",
    title: "UNORDERED REMOTE CALL",
    error_type: ErrorType::Compiler,
    message: "Remote call to `{}` may run before the local mutation of `{}` commits.",
    hint: Some("Wrap the remote call in Expr::after(vec![local_mutation], remote_call)."),
};

pub const UNKNOWN_REMOTE_METHOD: ErrorCode = ErrorCode {
    code: "E019",
    title: "UNKNOWN REMOTE METHOD",
    error_type: ErrorType::Compiler,
    message: "Cluster `{}` has no {} method named `{}`.",
    hint: None,
};

pub const INVALID_LOAD: ErrorCode = ErrorCode {
    code: "E020",
    title: "INVALID LOAD",
    error_type: ErrorType::Compiler,
    message: "Cannot load a collection from a reference: {}.",
    hint: Some("Use copy_from to build a collection from a computed source."),
};

pub const SERIALIZATION: ErrorCode = ErrorCode {
    code: "E021",
    title: "SERIALIZATION",
    error_type: ErrorType::Compiler,
    message: "Failed to serialize `{}`: {}.",
    hint: None,
};

pub const NON_FINITE_NUMBER: ErrorCode = ErrorCode {
    code: "E022",
    title: "NON-FINITE NUMBER",
    error_type: ErrorType::Compiler,
    message: "`{}` has no JSON representation.",
    hint: Some("Only finite numbers can be sent to the host. Model the missing value with Expr::none()."),
};

pub const ERROR_CODES: &[ErrorCode] = &[
    DUPLICATE_NAME,
    UNRESOLVED_REFERENCE,
    FORWARD_REFERENCE,
    CYCLIC_REFERENCE,
    SHADOWED_NAME,
    NO_ENCLOSING_CLASS,
    UNKNOWN_MEMBER,
    METHOD_KIND_MISMATCH,
    UNADDRESSABLE_SUBJECT,
    INVALID_NAME,
    RESERVED_NAME,
    DUPLICATE_MEMBER,
    DUPLICATE_COLUMN,
    UNKNOWN_COLUMN,
    EMPTY_KEY,
    EMPTY_INDEX,
    INVALID_LINK,
    UNORDERED_REMOTE_CALL,
    UNKNOWN_REMOTE_METHOD,
    INVALID_LOAD,
    SERIALIZATION,
    NON_FINITE_NUMBER,
];

pub fn lookup_error_code(code: &str) -> Option<&'static ErrorCode> {
    ERROR_CODES.iter().find(|item| item.code == code)
}
