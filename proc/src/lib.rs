use proc_macro::TokenStream;

/// Generates get, set and remove accessors for a single string value.
///
/// ```ignore
/// audiometa_proc::string_value_accessor!("title", "©nam");
/// ```
#[proc_macro]
pub fn string_value_accessor(input: TokenStream) -> TokenStream {
    let str = input.to_string();
    let mut token_strings = str.split(',');

    let function_ident = token_strings
        .next()
        .expect("Expected function ident")
        .trim()
        .replace('"', "");
    let ident_string = token_strings
        .next()
        .expect("Expected ident string")
        .trim()
        .replace('"', "");

    let name = function_ident.replace('_', " ");
    let mut name_chars = name.chars();
    let headline = format!(
        "{}{}",
        name_chars.next().expect("Expected non empty function ident").to_uppercase(),
        name_chars.collect::<String>(),
    );

    let ident_path = format!("ident::{}", function_ident.to_uppercase());

    format!(
        "
/// ### {headline}
impl Tag {{
    /// Returns the {name} (`{ident_string}`).
    pub fn {function_ident}(&self) -> Option<&str> {{
        self.string(&{ident_path}).next()
    }}

    /// Sets the {name} (`{ident_string}`).
    pub fn set_{function_ident}(&mut self, {function_ident}: impl Into<String>) {{
        self.set_data({ident_path}, Data::Utf8({function_ident}.into()));
    }}

    /// Removes the {name} (`{ident_string}`).
    pub fn remove_{function_ident}(&mut self) {{
        self.remove_data(&{ident_path});
    }}
}}
",
    )
    .parse()
    .expect("Error parsing accessor implementation")
}
