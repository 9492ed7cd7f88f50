//! Placement rules: where a treatment item is written on the chart.

use crate::catalog::{TreatmentCatalog, CROWN_ID};
use crate::models::{AppliesTo, Surface, TreatmentDefinition, TreatmentItem};

use super::DentitionEngine;

/// Chart slot(s) an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Replace every coronal surface with `[item]` (crowns)
    CoronalSurfaces,
    /// Replace-or-append on one coronal surface
    Surface(Surface),
    /// Replace-or-append on the root slot
    Root,
    /// Replace-or-append on the whole-tooth list and clear coronal surfaces
    WholeTooth,
    /// Scope and site disagree; nothing is charted
    Unplaceable,
}

impl Placement {
    /// Decide the placement of an item given its catalog definition.
    pub fn for_item(definition: &TreatmentDefinition, item: &TreatmentItem) -> Self {
        match definition.applies_to {
            AppliesTo::Surface => match item.site.coronal_surface() {
                Some(_) if definition.id == CROWN_ID => Placement::CoronalSurfaces,
                Some(surface) => Placement::Surface(surface),
                None => Placement::Unplaceable,
            },
            AppliesTo::Root if item.site.is_root_or_whole() => Placement::Root,
            AppliesTo::Root => Placement::Unplaceable,
            AppliesTo::WholeTooth => Placement::WholeTooth,
        }
    }
}

impl DentitionEngine {
    /// Write an item into the chart of its tooth.
    ///
    /// The write happens for either status, so an item toggled back to
    /// proposed stays on the chart with its new status. Unknown treatments,
    /// unknown teeth and unplaceable scope/site pairs leave the chart as is.
    pub fn place_item(&self, catalog: &TreatmentCatalog, item: &TreatmentItem) -> Self {
        let Some(definition) = catalog.lookup(&item.treatment_id) else {
            tracing::warn!(
                item_id = %item.id,
                treatment_id = %item.treatment_id,
                "placement skipped: unknown treatment"
            );
            return self.clone();
        };

        let placement = Placement::for_item(definition, item);
        if placement == Placement::Unplaceable {
            tracing::warn!(
                item_id = %item.id,
                treatment_id = %item.treatment_id,
                site = %item.site,
                "placement skipped: site does not match treatment scope"
            );
            return self.clone();
        }

        let mut next = self.clone();
        let placed = next.edit_tooth(item.tooth_id, |tooth| match placement {
            Placement::CoronalSurfaces => tooth.fill_coronal(item),
            Placement::Surface(surface) => tooth.upsert_surface(surface, item.clone()),
            Placement::Root => tooth.upsert_surface(Surface::Root, item.clone()),
            Placement::WholeTooth => {
                tooth.upsert_whole(item.clone());
                tooth.clear_coronal();
            }
            Placement::Unplaceable => {}
        });

        if placed.is_none() {
            tracing::warn!(item_id = %item.id, tooth_id = item.tooth_id, "placement skipped: unknown tooth");
            return self.clone();
        }

        tracing::debug!(
            item_id = %item.id,
            tooth_id = item.tooth_id,
            status = item.status.as_str(),
            ?placement,
            "item placed on chart"
        );
        next
    }
}
