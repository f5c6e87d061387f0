//! Sector index maps and the CSV tables assembled from them.

use crate::error::SchemaError;

/// Fixed lookup from a dotted sector path to a row offset in a workbook.
/// `None` means the sector exists in the taxonomy but the dataset does not
/// provide it.
#[derive(Debug, Clone, Copy)]
pub struct SectorIndexMap {
    pub name: &'static str,
    entries: &'static [(&'static str, Option<usize>)],
}

impl SectorIndexMap {
    /// Row offset for `path`. Unknown paths are an error; known but
    /// unavailable ones are `Ok(None)`.
    pub fn row(&self, path: &str) -> Result<Option<usize>, SchemaError> {
        self.entries
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, r)| *r)
            .ok_or_else(|| SchemaError::UnknownSector(path.to_string()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    /// Highest row offset referenced by this map.
    pub fn max_row(&self) -> usize {
        self.entries.iter().filter_map(|(_, r)| *r).max().unwrap_or(0)
    }
}

/// Where an output column takes its values from.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Row(&'static str),
    /// Element-wise sum; missing in any term means missing in the result.
    Sum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub source: Source,
}

#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub file: &'static str,
    pub columns: &'static [ColumnDef],
}

const fn col(name: &'static str, path: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        source: Source::Row(path),
    }
}

/// Rows of the intermediate workbook, i.e. of the CRF Summary2 sheet.
pub const HISTORICAL: SectorIndexMap = SectorIndexMap {
    name: "historical",
    entries: &[
        ("total_net", Some(0)),
        ("energy.total", Some(1)),
        ("energy.fuel_combustion_activities.total", Some(2)),
        ("energy.fuel_combustion_activities.energy_industries", Some(3)),
        ("energy.fuel_combustion_activities.manufacturing_construction", Some(4)),
        ("energy.fuel_combustion_activities.transport", Some(5)),
        ("energy.fuel_combustion_activities.other_sectors", Some(6)),
        ("energy.fuel_combustion_activities.other", Some(7)),
        ("energy.fugitive_emissions_from_fuels.total", Some(8)),
        ("energy.fugitive_emissions_from_fuels.solid_fuels", Some(9)),
        ("energy.fugitive_emissions_from_fuels.oil_natural_gas_and_energy_production", Some(10)),
        ("energy.co2_transport_storage", Some(11)),
        ("industrial_processes.total", Some(12)),
        ("industrial_processes.mineral_industry", Some(13)),
        ("industrial_processes.chemical_industry", Some(14)),
        ("industrial_processes.metal_industry", Some(15)),
        ("industrial_processes.non_energy_products_from_fuels", Some(16)),
        ("industrial_processes.electronic_industry", Some(17)),
        ("industrial_processes.product_usese_as_ODS", Some(18)),
        ("industrial_processes.other_product_manufacture_use", Some(19)),
        ("industrial_processes.other", Some(20)),
        ("agriculture.total", Some(21)),
        ("agriculture.enteric_fermentation", Some(22)),
        ("agriculture.manure_management", Some(23)),
        ("agriculture.rice_cultivation", Some(24)),
        ("agriculture.agricultural_soils", Some(25)),
        ("agriculture.prescribed_burning_of_savannas", Some(26)),
        ("agriculture.field_burning_agricultural_residues", Some(27)),
        ("agriculture.liming", Some(28)),
        ("agriculture.urea_application", Some(29)),
        ("agriculture.carbon_containing_fertilizers", Some(30)),
        ("agriculture.other", Some(31)),
        ("lulucf.total", Some(32)),
        ("lulucf.forest_land", Some(33)),
        ("lulucf.cropland", Some(34)),
        ("lulucf.grassland", Some(35)),
        ("lulucf.wetlands", Some(36)),
        ("lulucf.settlements", Some(37)),
        ("lulucf.other_land", Some(38)),
        ("lulucf.harvested_wood_prducts", Some(39)),
        ("lulucf.other", Some(40)),
        ("waste.total", Some(41)),
        ("waste.solid_waste_disposal", Some(42)),
        ("waste.biological_treatment_solid_waste", Some(43)),
        ("waste.incineration_open_burning_waste", Some(44)),
        ("waste.waste_water_treatment_discharge", Some(45)),
        ("waste.other", Some(46)),
        ("other", Some(47)),
        ("international_bunkers.total", Some(50)),
        ("international_bunkers.aviation", Some(51)),
        ("international_bunkers.navigation", Some(52)),
        ("multilateral_operations", Some(53)),
        ("co2_emissions_from_biomass", Some(54)),
        ("co2_captured", Some(55)),
        ("longerim_storage_waste_disposal", Some(56)),
        ("indirect_n20", Some(57)),
        ("indirect_co2", Some(58)),
        ("total_source", Some(59)),
    ],
};

/// Rows of one NEPN scenario block. Only top-level categories are projected.
pub const NEPN: SectorIndexMap = SectorIndexMap {
    name: "nepn",
    entries: &[
        ("total_net", None),
        ("energy.total", Some(0)),
        ("energy.fuel_combustion_activities.total", Some(1)),
        ("energy.fuel_combustion_activities.energy_industries", Some(2)),
        ("energy.fuel_combustion_activities.manufacturing_construction", Some(3)),
        ("energy.fuel_combustion_activities.transport", Some(4)),
        ("energy.fuel_combustion_activities.other_sectors", Some(5)),
        ("energy.fuel_combustion_activities.other", Some(6)),
        ("energy.fugitive_emissions_from_fuels.total", Some(7)),
        ("energy.fugitive_emissions_from_fuels.solid_fuels", None),
        ("energy.fugitive_emissions_from_fuels.oil_natural_gas_and_energy_production", None),
        ("energy.co2_transport_storage", None),
        ("industrial_processes.total", Some(8)),
        ("industrial_processes.mineral_industry", None),
        ("industrial_processes.chemical_industry", None),
        ("industrial_processes.metal_industry", None),
        ("industrial_processes.non_energy_products_from_fuels", None),
        ("industrial_processes.electronic_industry", None),
        ("industrial_processes.product_usese_as_ODS", None),
        ("industrial_processes.other_product_manufacture_use", None),
        ("industrial_processes.other", None),
        ("agriculture.total", Some(9)),
        ("agriculture.enteric_fermentation", None),
        ("agriculture.manure_management", None),
        ("agriculture.rice_cultivation", None),
        ("agriculture.agricultural_soils", None),
        ("agriculture.prescribed_burning_of_savannas", None),
        ("agriculture.field_burning_agricultural_residues", None),
        ("agriculture.liming", None),
        ("agriculture.urea_application", None),
        ("agriculture.carbon_containing_fertilizers", None),
        ("agriculture.other", None),
        ("lulucf.total", Some(10)),
        ("lulucf.forest_land", Some(11)),
        ("lulucf.cropland", Some(12)),
        ("lulucf.grassland", Some(13)),
        ("lulucf.wetlands", Some(14)),
        ("lulucf.settlements", Some(15)),
        ("lulucf.other_land", Some(16)),
        ("lulucf.harvested_wood_prducts", Some(17)),
        ("lulucf.other", None),
        ("waste.total", Some(18)),
        ("waste.solid_waste_disposal", None),
        ("waste.biological_treatment_solid_waste", None),
        ("waste.incineration_open_burning_waste", None),
        ("waste.waste_water_treatment_discharge", None),
        ("waste.other", None),
        ("other", None),
        ("international_bunkers.total", None),
        ("international_bunkers.aviation", None),
        ("international_bunkers.navigation", None),
        ("multilateral_operations", None),
        ("co2_emissions_from_biomass", None),
        ("co2_captured", None),
        ("longerim_storage_waste_disposal", None),
        ("indirect_n20", None),
        ("indirect_co2", None),
        ("total_source", Some(19)),
    ],
};

const OTHERS: Source = Source::Sum(&[
    "energy.fuel_combustion_activities.other",
    "energy.fugitive_emissions_from_fuels.total",
]);

/// The seven historical exports, in write order.
pub const HISTORICAL_TABLES: [TableDef; 7] = [
    TableDef {
        file: "emissions.historical.csv",
        columns: &[
            col("total_source", "total_source"),
            col("energy_industries", "energy.fuel_combustion_activities.energy_industries"),
            col(
                "manufacturing_construction_fuels",
                "energy.fuel_combustion_activities.manufacturing_construction",
            ),
            col("transport", "energy.fuel_combustion_activities.transport"),
            col("industrial_processes", "industrial_processes.total"),
            col(
                "residential_commercial_agricultural_forestry_fishing_fuels",
                "energy.fuel_combustion_activities.other_sectors",
            ),
            col("agriculture", "agriculture.total"),
            col("waste", "waste.total"),
            col("international_aviation", "international_bunkers.aviation"),
            col("international_navigation", "international_bunkers.navigation"),
            col("co2_emissions_from_biomass", "co2_emissions_from_biomass"),
            ColumnDef {
                name: "others",
                source: OTHERS,
            },
            col("lulucf", "lulucf.total"),
        ],
    },
    TableDef {
        file: "emissions.historical.energy.csv",
        columns: &[
            col("total", "energy.total"),
            col("fuel_combustion_activities.total", "energy.fuel_combustion_activities.total"),
            col(
                "fuel_combustion_activities.energy_industries",
                "energy.fuel_combustion_activities.energy_industries",
            ),
            col(
                "fuel_combustion_activities.manufacturing_construction",
                "energy.fuel_combustion_activities.manufacturing_construction",
            ),
            col(
                "fuel_combustion_activities.transport",
                "energy.fuel_combustion_activities.transport",
            ),
            col(
                "fuel_combustion_activities.other_sectors",
                "energy.fuel_combustion_activities.other_sectors",
            ),
            col("fuel_combustion_activities.other", "energy.fuel_combustion_activities.other"),
            col(
                "fugitive_emissions_from_fuels.total",
                "energy.fugitive_emissions_from_fuels.total",
            ),
            col(
                "fugitive_emissions_from_fuels.solid_fuels",
                "energy.fugitive_emissions_from_fuels.solid_fuels",
            ),
            col(
                "fugitive_emissions_from_fuels.oil_natural_gas_and_energy_production",
                "energy.fugitive_emissions_from_fuels.oil_natural_gas_and_energy_production",
            ),
            col("co2_transport_storage", "energy.co2_transport_storage"),
        ],
    },
    TableDef {
        file: "emissions.historical.industrial.processes.csv",
        columns: &[
            col("total", "industrial_processes.total"),
            col("mineral_industry", "industrial_processes.mineral_industry"),
            col("chemical_industry", "industrial_processes.chemical_industry"),
            col("metal_industry", "industrial_processes.metal_industry"),
            col(
                "non_energy_products_from_fuels",
                "industrial_processes.non_energy_products_from_fuels",
            ),
            col("electronic_industry", "industrial_processes.electronic_industry"),
            col("product_usese_as_ODS", "industrial_processes.product_usese_as_ODS"),
            col(
                "other_product_manufacture_use",
                "industrial_processes.other_product_manufacture_use",
            ),
            col("other", "industrial_processes.other"),
        ],
    },
    TableDef {
        file: "emissions.historical.agriculture.csv",
        columns: &[
            col("total", "agriculture.total"),
            col("enteric_fermentation", "agriculture.enteric_fermentation"),
            col("manure_management", "agriculture.manure_management"),
            col("rice_cultivation", "agriculture.rice_cultivation"),
            col("agricultural_soils", "agriculture.agricultural_soils"),
            col(
                "prescribed_burning_of_savannas",
                "agriculture.prescribed_burning_of_savannas",
            ),
            col(
                "field_burning_agricultural_residues",
                "agriculture.field_burning_agricultural_residues",
            ),
            col("liming", "agriculture.liming"),
            col("urea_application", "agriculture.urea_application"),
            col("carbon_containing_fertilizers", "agriculture.carbon_containing_fertilizers"),
            col("other", "agriculture.other"),
        ],
    },
    TableDef {
        file: "emissions.historical.lulucf.csv",
        columns: &[
            col("total", "lulucf.total"),
            col("forest_land", "lulucf.forest_land"),
            col("cropland", "lulucf.cropland"),
            col("grassland", "lulucf.grassland"),
            col("wetlands", "lulucf.wetlands"),
            col("settlements", "lulucf.settlements"),
            col("other_land", "lulucf.other_land"),
            col("harvested_wood_prducts", "lulucf.harvested_wood_prducts"),
            col("other", "lulucf.other"),
        ],
    },
    TableDef {
        file: "emissions.historical.waste.csv",
        columns: &[
            col("total", "waste.total"),
            col("solid_waste_disposal", "waste.solid_waste_disposal"),
            col(
                "biological_treatment_solid_waste",
                "waste.biological_treatment_solid_waste",
            ),
            col(
                "incineration_open_burning_waste",
                "waste.incineration_open_burning_waste",
            ),
            col(
                "waste_water_treatment_discharge",
                "waste.waste_water_treatment_discharge",
            ),
            col("other", "waste.other"),
        ],
    },
    TableDef {
        file: "emissions.historical.memo_items.csv",
        columns: &[
            col("international_bunkers.total", "international_bunkers.total"),
            col("international_bunkers.aviation", "international_bunkers.aviation"),
            col("international_bunkers.navigation", "international_bunkers.navigation"),
            col("multilateral_operations", "multilateral_operations"),
            col("co2_emissions_from_biomass", "co2_emissions_from_biomass"),
            col("co2_captured", "co2_captured"),
            col("longerim_storage_waste_disposal", "longerim_storage_waste_disposal"),
            col("indirect_n20", "indirect_n20"),
            col("indirect_co2", "indirect_co2"),
        ],
    },
];

/// Columns of every NEPN scenario export (file name is per scenario).
pub const PROJECTION_COLUMNS: &[ColumnDef] = &[
    col("total_source", "total_source"),
    col("energy_industries", "energy.fuel_combustion_activities.energy_industries"),
    col(
        "manufacturing_construction_fuels",
        "energy.fuel_combustion_activities.manufacturing_construction",
    ),
    col("transport", "energy.fuel_combustion_activities.transport"),
    col("industrial_processes", "industrial_processes.total"),
    col(
        "residential_commercial_agricultural_forestry_fishing_fuels",
        "energy.fuel_combustion_activities.other_sectors",
    ),
    col("agriculture", "agriculture.total"),
    col("waste", "waste.total"),
    ColumnDef {
        name: "others",
        source: OTHERS,
    },
    col("lulucf", "lulucf.total"),
];
