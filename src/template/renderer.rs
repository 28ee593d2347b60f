//! Template rendering.
//!
//! The renderer walks a template's segments left to right, keeping an
//! accumulator of partial output strings, `[""]` to begin with. Literal
//! text appends to every partial; a field's value list multiplies the
//! accumulator (outer loop over existing partials, inner loop over the
//! field's values), which is what makes a template with multi-valued
//! fields render to multiple output paths. A `+` prefix opts a single
//! field out of the multiplication by joining its values in place.
//!
//! Within one field, evaluation is fixed: provider lookup, dot-path
//! navigation, filters, find/replace, conditional, boolean/default
//! branching, then expansion into the accumulator. Sub-templates render
//! in that same order, so a variable bound while rendering a conditional
//! candidate is visible to the boolean and default branches, which render
//! last and only when chosen. The meta-fields `var`, `strip`, and
//! `format` are handled here rather than by any provider.

use crate::options::RenderOptions;
use crate::provider::{FileContext, ProviderRegistry};
use crate::value::{self, MetaValue};

use super::ast::{FieldExpr, Segment, Template};
use super::error::TemplateError;
use super::filters;
use super::formatspec::{self, CoerceType, FormatFailure};
use super::vars::Variables;

/// Renders parsed templates against a provider registry.
///
/// An engine owns an immutable registry and a set of [`RenderOptions`];
/// renders never mutate it, so one engine can serve any number of files.
/// Each render gets a fresh variable environment; `{var:…}` bindings never
/// leak between renders.
///
/// # Examples
///
/// ```
/// use pathmint::{FileContext, ProviderRegistry, Template, TemplateEngine};
///
/// let engine = TemplateEngine::new(ProviderRegistry::with_defaults());
/// let template = Template::parse("{filepath.stem}{filepath.suffix}")?;
/// let ctx = FileContext::new("/music/track.mp3");
/// assert_eq!(engine.render(&template, &ctx)?, vec!["track.mp3"]);
/// # Ok::<(), pathmint::TemplateError>(())
/// ```
pub struct TemplateEngine {
    registry: ProviderRegistry,
    options: RenderOptions,
}

impl TemplateEngine {
    /// Create an engine with default render options.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_options(registry, RenderOptions::default())
    }

    /// Create an engine with explicit render options.
    pub fn with_options(registry: ProviderRegistry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// The registry this engine dispatches lookups to.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The options this engine renders with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a parsed template for one file.
    ///
    /// Returns the ordered list of rendered strings; the list always has at
    /// least one element. No partial output is produced on error.
    ///
    /// # Errors
    ///
    /// See [`TemplateError`] for the failure modes: unknown fields, failed
    /// hard-policy providers, undefined `{%NAME}` references, invalid dot
    /// attributes, and value misuse such as a multi-valued delimiter.
    pub fn render(
        &self,
        template: &Template,
        ctx: &FileContext,
    ) -> Result<Vec<String>, TemplateError> {
        let mut vars = Variables::default();
        let mut rendered = self.render_template(template, ctx, &mut vars)?;
        if self.options.strip {
            rendered = rendered.into_iter().map(|s| s.trim().to_string()).collect();
        }
        Ok(rendered)
    }

    /// Parse and render in one call.
    pub fn render_str(
        &self,
        source: &str,
        ctx: &FileContext,
    ) -> Result<Vec<String>, TemplateError> {
        let template = Template::parse(source)?;
        self.render(&template, ctx)
    }

    fn render_template(
        &self,
        template: &Template,
        ctx: &FileContext,
        vars: &mut Variables,
    ) -> Result<Vec<String>, TemplateError> {
        let mut acc = vec![String::new()];
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => {
                    let expanded = vars
                        .expand(text)
                        .map_err(|message| TemplateError::value(template.span, message))?;
                    for partial in &mut acc {
                        partial.push_str(&expanded);
                    }
                }
                Segment::Field(field) => self.render_field(field, ctx, vars, &mut acc)?,
            }
        }
        Ok(acc)
    }

    fn render_field(
        &self,
        field: &FieldExpr,
        ctx: &FileContext,
        vars: &mut Variables,
        acc: &mut Vec<String>,
    ) -> Result<(), TemplateError> {
        // {var:NAME,VALUE} binds and contributes nothing.
        if field.name == "var" {
            let name = field
                .subfield
                .as_deref()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    TemplateError::value(field.span, "var requires a name: {var:NAME,VALUE}")
                })?;
            if !Variables::is_valid_name(name) {
                return Err(TemplateError::value(
                    field.span,
                    format!("invalid variable name '{name}'"),
                ));
            }
            let branch = field.default_branch.as_ref().ok_or_else(|| {
                TemplateError::value(field.span, "var requires a value: {var:NAME,VALUE}")
            })?;
            let values = self.render_template(branch, ctx, vars)?;
            vars.define(name, values);
            return Ok(());
        }

        // Set when the default branch is consumed as an operand (strip,
        // format, strftime) and is no longer available as a fallback.
        let mut default_consumed = false;

        let mut vals = self.field_values(field, ctx, vars, &mut default_consumed)?;

        for filter in &field.filters {
            vals = filters::apply(filter, vals, vars)
                .map_err(|message| TemplateError::value(filter.span, message))?;
        }

        for (find_raw, replace_template) in &field.replacements {
            let find = vars
                .expand(find_raw)
                .map_err(|message| TemplateError::value(field.span, message))?;
            let replace = self.render_single(replace_template, ctx, vars, field, "replace text")?;
            vals = vals
                .into_iter()
                .map(|v| v.replace(&find, &replace))
                .collect();
        }

        let cond_result = match &field.conditional {
            Some(cond) => {
                let mut rhs = Vec::new();
                for alternative in &cond.rhs {
                    rhs.extend(self.render_template(alternative, ctx, vars)?);
                }
                Some(cond.evaluate(&vals, &rhs))
            }
            None => None,
        };

        // The branches render last, and only the chosen one renders, so
        // side effects in an untaken branch never happen.
        vals = if let Some(branch) = &field.bool_branch {
            let truthy = match cond_result {
                Some(result) => result,
                None => !effectively_empty(&vals),
            };
            if truthy {
                self.render_template(branch, ctx, vars)?
            } else {
                self.fallback_values(field, ctx, vars, default_consumed)?
            }
        } else if cond_result == Some(false) || effectively_empty(&vals) {
            self.fallback_values(field, ctx, vars, default_consumed)?
        } else {
            vals
        };

        // The in-place join happens at expansion time, after the whole
        // pipeline, so a `+` field contributes exactly one string no matter
        // what its filters did.
        if field.in_place || self.options.expand_inplace {
            let sep = if field.in_place {
                match &field.delim {
                    Some(delim) => vars
                        .expand(delim)
                        .map_err(|message| TemplateError::value(field.span, message))?,
                    None => String::new(),
                }
            } else {
                self.options.inplace_sep.clone()
            };
            vals = vec![vals.join(&sep)];
        }

        let mut expanded = Vec::with_capacity(acc.len() * vals.len());
        for prefix in acc.iter() {
            for v in &vals {
                let mut joined = String::with_capacity(prefix.len() + v.len());
                joined.push_str(prefix);
                joined.push_str(v);
                expanded.push(joined);
            }
        }
        *acc = expanded;
        Ok(())
    }

    /// Resolve a field's raw value list: variable reference, `strip`/
    /// `format` meta-field, or registry lookup plus dot-path navigation.
    fn field_values(
        &self,
        field: &FieldExpr,
        ctx: &FileContext,
        vars: &mut Variables,
        default_consumed: &mut bool,
    ) -> Result<Vec<String>, TemplateError> {
        if let Some(var_name) = field.name.strip_prefix('%') {
            let bound = vars
                .get(var_name)
                .ok_or_else(|| TemplateError::UndefinedVariable {
                    name: var_name.to_string(),
                    span: field.span,
                })?
                .to_vec();
            return self.apply_list_path(field, bound, &field.path, default_consumed);
        }

        if field.name == "strip" {
            let rendered = self
                .consume_default(field, ctx, vars, default_consumed)?
                .unwrap_or_default();
            return Ok(rendered.into_iter().map(|v| v.trim().to_string()).collect());
        }

        if field.name == "format" {
            return self.format_values(field, ctx, vars, default_consumed);
        }

        let value = match self
            .registry
            .lookup(&field.name, field.subfield.as_deref(), ctx)
        {
            None => {
                return Err(TemplateError::UnknownField {
                    name: field.name.clone(),
                    span: field.span,
                });
            }
            Some(Err(source)) => {
                return Err(TemplateError::Provider {
                    name: field.name.clone(),
                    span: field.span,
                    source,
                });
            }
            Some(Ok(value)) => value,
        };

        match value {
            MetaValue::Null => Ok(Vec::new()),
            MetaValue::List(values) => {
                self.apply_list_path(field, values, &field.path, default_consumed)
            }
            MetaValue::DateTime(dt) => {
                let Some((first, rest)) = field.path.split_first() else {
                    return Ok(vec![value::datetime_iso(&dt)]);
                };
                let vals = if first == "strftime" {
                    match self.consume_default(field, ctx, vars, default_consumed)? {
                        Some(rendered) => {
                            if rendered.len() != 1 {
                                return Err(TemplateError::value(
                                    field.span,
                                    format!(
                                        "strftime format must render to a single value, got {}",
                                        rendered.len()
                                    ),
                                ));
                            }
                            let formatted = value::strftime(&dt, &rendered[0])
                                .map_err(|message| TemplateError::value(field.span, message))?;
                            vec![formatted]
                        }
                        None => Vec::new(),
                    }
                } else if let Some(formatted) = value::datetime_attr(&dt, first) {
                    vec![formatted]
                } else {
                    return Err(TemplateError::InvalidPath {
                        name: field.name.clone(),
                        attr: first.clone(),
                        span: field.span,
                    });
                };
                self.apply_list_path(field, vals, rest, default_consumed)
            }
        }
    }

    /// Navigate path-component attributes over a list value.
    fn apply_list_path(
        &self,
        field: &FieldExpr,
        mut vals: Vec<String>,
        attrs: &[String],
        default_consumed: &mut bool,
    ) -> Result<Vec<String>, TemplateError> {
        for attr in attrs {
            if attr == "strftime" {
                tracing::warn!(
                    field = %field.name,
                    "strftime applied to a non-datetime value; treating as missing"
                );
                // The default branch was the strftime format, not a
                // fallback; it stays unrendered.
                *default_consumed = true;
                return Ok(Vec::new());
            }
            vals = vals
                .iter()
                .map(|v| value::path_attr(v, attr))
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| TemplateError::InvalidPath {
                    name: field.name.clone(),
                    attr: attr.clone(),
                    span: field.span,
                })?;
        }
        Ok(vals)
    }

    /// Evaluate `{format:TYPE:FORMAT,TEMPLATE}`.
    fn format_values(
        &self,
        field: &FieldExpr,
        ctx: &FileContext,
        vars: &mut Variables,
        default_consumed: &mut bool,
    ) -> Result<Vec<String>, TemplateError> {
        let subfield = field.subfield.as_deref().unwrap_or("");
        let (type_name, format_raw) = subfield.split_once(':').ok_or_else(|| {
            TemplateError::value(
                field.span,
                "format requires a subfield in the form TYPE:FORMAT",
            )
        })?;
        let ty = CoerceType::from_name(type_name).ok_or_else(|| {
            TemplateError::value(
                field.span,
                format!("'{type_name}' is not a valid format type: must be one of 'int', 'float', 'str'"),
            )
        })?;
        let format_spec = vars
            .expand(format_raw)
            .map_err(|message| TemplateError::value(field.span, message))?;

        let rendered = self
            .consume_default(field, ctx, vars, default_consumed)?
            .unwrap_or_default();
        let mut formatted = Vec::with_capacity(rendered.len());
        for element in rendered {
            match formatspec::format_value(&element, ty, &format_spec) {
                Ok(value) => formatted.push(value),
                Err(FormatFailure::Coercion) => {
                    tracing::warn!(
                        value = %element,
                        "format coercion failed; emitting value unchanged"
                    );
                    formatted.push(element);
                }
                Err(FormatFailure::Spec(message)) => {
                    return Err(TemplateError::value(field.span, message));
                }
            }
        }
        Ok(formatted)
    }

    /// Render the default branch as an operand (for `strip`, `format`, and
    /// `strftime`), removing it from fallback duty.
    fn consume_default(
        &self,
        field: &FieldExpr,
        ctx: &FileContext,
        vars: &mut Variables,
        default_consumed: &mut bool,
    ) -> Result<Option<Vec<String>>, TemplateError> {
        *default_consumed = true;
        match &field.default_branch {
            Some(branch) => Ok(Some(self.render_template(branch, ctx, vars)?)),
            None => Ok(None),
        }
    }

    /// The substitute for a field with no value: the default branch when it
    /// is present and still unconsumed, the missing-value sentinel
    /// otherwise.
    fn fallback_values(
        &self,
        field: &FieldExpr,
        ctx: &FileContext,
        vars: &mut Variables,
        default_consumed: bool,
    ) -> Result<Vec<String>, TemplateError> {
        match &field.default_branch {
            Some(branch) if !default_consumed => self.render_template(branch, ctx, vars),
            _ => Ok(vec![self.options.none_str.clone()]),
        }
    }

    /// Render a sub-template that must produce exactly one string.
    fn render_single(
        &self,
        template: &Template,
        ctx: &FileContext,
        vars: &mut Variables,
        field: &FieldExpr,
        what: &str,
    ) -> Result<String, TemplateError> {
        let rendered = self.render_template(template, ctx, vars)?;
        if rendered.len() == 1 {
            Ok(rendered.into_iter().next().expect("length checked"))
        } else {
            Err(TemplateError::value(
                field.span,
                format!("{what} must render to a single value, got {}", rendered.len()),
            ))
        }
    }
}

fn effectively_empty(vals: &[String]) -> bool {
    vals.is_empty() || vals.iter().all(String::is_empty)
}
