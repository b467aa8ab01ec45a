//! # Selection Enrichment
//!
//! The UI records selections under the root type it rendered, using dotted paths that
//! run straight through nested objects, arrays and `$ref`s (`owner.address.city`).
//! The type builder, however, looks selections up by the type it is currently
//! building. Enrichment bridges the two: it walks each dotted path against the schema
//! and, whenever the walk crosses into a referenced type, re-roots the remaining path
//! under that type's own name.

use crate::oas::document::{OpenApiDocument, SchemaNode};
use crate::oas::ref_utils::{get_ref_name, ref_of, resolve_ref};
use crate::oas::schemas::effective_properties;
use crate::selection::{SelectionMap, ARRAY_ITEM_SEGMENT};

/// Expands a selection map across `$ref` and array-item boundaries.
///
/// For every selected dotted path of every type found in `components.schemas`, the
/// path is walked segment by segment:
/// - `"0"` steps into `items`; if the items are a `$ref`, the walk continues under the
///   referenced type.
/// - a property name steps into that property; a `$ref` property, or an array property
///   whose items are a `$ref`, continues under the referenced type (an optional `"0"`
///   right after the array property is consumed).
/// - the last segment is recorded as selected under the type the walk is in, keyed by
///   the path relative to where that type was entered.
///
/// Unknown properties and schema gaps end the walk silently. The input is left
/// untouched; the result only ever adds entries, existing values (including `false`)
/// are kept.
pub fn enrich_selected_attributes(
    selections: &SelectionMap,
    spec: &OpenApiDocument,
) -> SelectionMap {
    let mut enriched = selections.clone();

    for (type_name, attrs) in selections.iter() {
        let Some(root) = spec.schema(type_name) else {
            tracing::trace!(type_name = %type_name, "not a component schema, skipping enrichment");
            continue;
        };

        for (path, selected) in attrs {
            if !*selected || !path.contains('.') {
                continue;
            }
            let segments: Vec<&str> = path.split('.').collect();
            walk(spec, &mut enriched, type_name, root, &[], &segments);
        }
    }

    tracing::debug!(
        before = selections.len(),
        after = enriched.len(),
        "enriched selection map"
    );
    enriched
}

fn walk<'s>(
    spec: &OpenApiDocument,
    out: &mut SelectionMap,
    context: &str,
    schema: &SchemaNode,
    consumed: &[&'s str],
    remaining: &[&'s str],
) {
    let Some((&segment, rest)) = remaining.split_first() else {
        return;
    };
    let relative: Vec<&str> = consumed.iter().copied().chain([segment]).collect();

    if segment == ARRAY_ITEM_SEGMENT {
        let Some(items) = schema.items.as_deref() else {
            return;
        };
        match ref_of(items) {
            Some(reference) => {
                if let Some(target) = resolve_ref(reference, spec) {
                    walk(spec, out, &get_ref_name(reference), target, &[], rest);
                }
            }
            None if rest.is_empty() => record(out, context, &relative),
            None => walk(spec, out, context, items, &relative, rest),
        }
        return;
    }

    let properties = effective_properties(schema, spec);
    let Some(property) = properties.get(segment).copied() else {
        return;
    };

    if rest.is_empty() {
        record(out, context, &relative);
        return;
    }

    if let Some(reference) = ref_of(property) {
        if let Some(target) = resolve_ref(reference, spec) {
            walk(spec, out, &get_ref_name(reference), target, &[], rest);
        }
        return;
    }

    let item_ref = if property.is_array() {
        property.items.as_deref().and_then(ref_of)
    } else {
        None
    };
    match item_ref {
        Some(reference) => {
            let Some(target) = resolve_ref(reference, spec) else {
                return;
            };
            let rest = match rest.split_first() {
                Some((&first, after)) if first == ARRAY_ITEM_SEGMENT => after,
                _ => rest,
            };
            walk(spec, out, &get_ref_name(reference), target, &[], rest);
        }
        None => walk(spec, out, context, property, &relative, rest),
    }
}

fn record(out: &mut SelectionMap, context: &str, relative: &[&str]) {
    let path = relative.join(".");
    if out.insert_if_absent(context, &path) {
        tracing::trace!(type_name = %context, path = %path, "derived selection");
    }
}
