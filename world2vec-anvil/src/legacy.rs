//! Pre-flattening numeric block ids.
//!
//! Sections written before 1.13 store a byte id per voxel (plus an optional
//! high nibble) and a 4-bit data value. The data value selects a variant
//! (wood type, colour) or carries block state such as facing and half,
//! which is converted into modern properties. Ids outside the vanilla
//! range read as no block at all and are ignored by every pass.

use world2vec_core::Block;

const COLORS: [&str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

const WOODS: [&str; 6] = ["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"];

const STONES: [&str; 7] = [
    "stone",
    "granite",
    "polished_granite",
    "diorite",
    "polished_diorite",
    "andesite",
    "polished_andesite",
];

const FLOWERS: [&str; 9] = [
    "poppy",
    "blue_orchid",
    "allium",
    "azure_bluet",
    "red_tulip",
    "orange_tulip",
    "white_tulip",
    "pink_tulip",
    "oxeye_daisy",
];

const TALL_PLANTS: [&str; 6] = ["sunflower", "lilac", "tall_grass", "large_fern", "rose_bush", "peony"];

const STONE_SLABS: [&str; 8] = [
    "smooth_stone",
    "sandstone",
    "petrified_oak",
    "cobblestone",
    "brick",
    "stone_brick",
    "nether_brick",
    "quartz",
];

const INFESTED: [&str; 6] = [
    "infested_stone",
    "infested_cobblestone",
    "infested_stone_bricks",
    "infested_mossy_stone_bricks",
    "infested_cracked_stone_bricks",
    "infested_chiseled_stone_bricks",
];

// Index = data value, per block family.
const FACING_6: [&str; 6] = ["down", "up", "north", "south", "west", "east"];
const STAIRS_FACING: [&str; 4] = ["east", "west", "south", "north"];
const DOOR_FACING: [&str; 4] = ["east", "south", "west", "north"];
const TRAPDOOR_FACING: [&str; 4] = ["north", "south", "west", "east"];
const SWNE: [&str; 4] = ["south", "west", "north", "east"];
const NESW: [&str; 4] = ["north", "east", "south", "west"];
const TORCH_FACING: [&str; 4] = ["east", "west", "south", "north"];
const RAIL_SHAPES: [&str; 10] = [
    "north_south",
    "east_west",
    "ascending_east",
    "ascending_west",
    "ascending_north",
    "ascending_south",
    "south_east",
    "south_west",
    "north_west",
    "north_east",
];

fn block(name: &str) -> Block {
    Block::new(format!("minecraft:{name}"))
}

fn bool_str(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

fn stairs(name: &str, data: usize) -> Block {
    block(&format!("{name}_stairs"))
        .with_property("facing", STAIRS_FACING[data & 0x3])
        .with_property("half", if data & 0x4 != 0 { "top" } else { "bottom" })
        .with_property("shape", "straight")
}

fn slab(name: &str, data: usize, double: bool) -> Block {
    let kind = match (double, data & 0x8 != 0) {
        (true, _) => "double",
        (false, true) => "top",
        (false, false) => "bottom",
    };
    block(&format!("{name}_slab")).with_property("type", kind)
}

fn door(name: &str, data: usize) -> Block {
    let door = block(&format!("{name}_door"));
    if data & 0x8 != 0 {
        // The upper half only records the hinge; facing lives in the lower half.
        door.with_property("half", "upper")
            .with_property("hinge", if data & 0x1 != 0 { "right" } else { "left" })
    } else {
        door.with_property("half", "lower")
            .with_property("facing", DOOR_FACING[data & 0x3])
            .with_property("open", bool_str(data & 0x4 != 0))
    }
}

fn trapdoor(name: &str, data: usize) -> Block {
    block(&format!("{name}_trapdoor"))
        .with_property("facing", TRAPDOOR_FACING[data & 0x3])
        .with_property("open", bool_str(data & 0x4 != 0))
        .with_property("half", if data & 0x8 != 0 { "top" } else { "bottom" })
}

fn fence_gate(name: &str, data: usize) -> Block {
    block(&format!("{name}_fence_gate"))
        .with_property("facing", SWNE[data & 0x3])
        .with_property("open", bool_str(data & 0x4 != 0))
}

fn log(name: &str, data: usize) -> Block {
    match data >> 2 {
        0 => block(&format!("{name}_log")).with_property("axis", "y"),
        1 => block(&format!("{name}_log")).with_property("axis", "x"),
        2 => block(&format!("{name}_log")).with_property("axis", "z"),
        _ => block(&format!("{name}_wood")).with_property("axis", "y"),
    }
}

fn leaves(name: &str, data: usize) -> Block {
    block(&format!("{name}_leaves")).with_property("persistent", bool_str(data & 0x4 != 0))
}

fn facing_6(name: &str, data: usize) -> Block {
    block(name).with_property("facing", FACING_6.get(data & 0x7).copied().unwrap_or("north"))
}

/// Chests, furnaces, ladders and wall signs: 2 north, 3 south, 4 west, 5 east.
fn horizontal(name: &str, data: usize) -> Block {
    let facing = match data {
        3 => "south",
        4 => "west",
        5 => "east",
        _ => "north",
    };
    block(name).with_property("facing", facing)
}

fn torch(name: &str, wall_name: &str, data: usize, lit: Option<bool>) -> Block {
    let torch = match data {
        1..=4 => block(wall_name).with_property("facing", TORCH_FACING[data - 1]),
        _ => block(name),
    };
    match lit {
        Some(lit) => torch.with_property("lit", bool_str(lit)),
        None => torch,
    }
}

fn powered_rail(name: &str, data: usize) -> Block {
    block(name)
        .with_property("shape", RAIL_SHAPES[(data & 0x7).min(5)])
        .with_property("powered", bool_str(data & 0x8 != 0))
}

fn button(name: &str, data: usize) -> Block {
    let (face, facing) = match data & 0x7 {
        0 => ("ceiling", "north"),
        1 => ("wall", "east"),
        2 => ("wall", "west"),
        3 => ("wall", "south"),
        4 => ("wall", "north"),
        _ => ("floor", "north"),
    };
    block(name)
        .with_property("face", face)
        .with_property("facing", facing)
        .with_property("powered", bool_str(data & 0x8 != 0))
}

fn colored(suffix: &str, data: usize) -> Block {
    block(&format!("{}_{suffix}", COLORS[data]))
}

/// Modern block for a legacy `(id, data)` pair.
pub fn legacy_block(id: u16, data: u8) -> Option<Block> {
    let data = (data & 0x0F) as usize;
    let wood = WOODS.get(data).copied().unwrap_or("oak");
    let converted = match id {
        0 => block("air"),
        1 => block(STONES.get(data).copied().unwrap_or("stone")),
        2 => block("grass_block").with_property("snowy", "false"),
        3 => block(match data {
            1 => "coarse_dirt",
            2 => "podzol",
            _ => "dirt",
        }),
        4 => block("cobblestone"),
        5 => block(&format!("{wood}_planks")),
        6 => block(&format!("{}_sapling", WOODS.get(data & 0x7).copied().unwrap_or("oak")))
            .with_property("stage", if data & 0x8 != 0 { "1" } else { "0" }),
        7 => block("bedrock"),
        8 | 9 => block("water").with_property("level", data.to_string()),
        10 | 11 => block("lava").with_property("level", data.to_string()),
        12 => block(if data == 1 { "red_sand" } else { "sand" }),
        13 => block("gravel"),
        14 => block("gold_ore"),
        15 => block("iron_ore"),
        16 => block("coal_ore"),
        17 => log(WOODS[data & 0x3], data),
        18 => leaves(WOODS[data & 0x3], data),
        19 => block(if data == 1 { "wet_sponge" } else { "sponge" }),
        20 => block("glass"),
        21 => block("lapis_ore"),
        22 => block("lapis_block"),
        23 => facing_6("dispenser", data).with_property("triggered", bool_str(data & 0x8 != 0)),
        24 => block(match data {
            1 => "chiseled_sandstone",
            2 => "cut_sandstone",
            _ => "sandstone",
        }),
        25 => block("note_block"),
        26 => block("red_bed")
            .with_property("facing", SWNE[data & 0x3])
            .with_property("part", if data & 0x8 != 0 { "head" } else { "foot" })
            .with_property("occupied", bool_str(data & 0x4 != 0)),
        27 => powered_rail("powered_rail", data),
        28 => powered_rail("detector_rail", data),
        29 => facing_6("sticky_piston", data).with_property("extended", bool_str(data & 0x8 != 0)),
        30 => block("cobweb"),
        31 => block(match data {
            0 => "dead_bush",
            2 => "fern",
            _ => "grass",
        }),
        32 => block("dead_bush"),
        33 => facing_6("piston", data).with_property("extended", bool_str(data & 0x8 != 0)),
        34 => facing_6("piston_head", data)
            .with_property("type", if data & 0x8 != 0 { "sticky" } else { "normal" }),
        35 => colored("wool", data),
        36 => facing_6("moving_piston", data),
        37 => block("dandelion"),
        38 => block(FLOWERS.get(data).copied().unwrap_or("poppy")),
        39 => block("brown_mushroom"),
        40 => block("red_mushroom"),
        41 => block("gold_block"),
        42 => block("iron_block"),
        43 => slab(STONE_SLABS[data & 0x7], data, true),
        44 => slab(STONE_SLABS[data & 0x7], data, false),
        45 => block("bricks"),
        46 => block("tnt"),
        47 => block("bookshelf"),
        48 => block("mossy_cobblestone"),
        49 => block("obsidian"),
        50 => torch("torch", "wall_torch", data, None),
        51 => block("fire").with_property("age", data.to_string()),
        52 => block("spawner"),
        53 => stairs("oak", data),
        54 => horizontal("chest", data),
        55 => block("redstone_wire").with_property("power", data.to_string()),
        56 => block("diamond_ore"),
        57 => block("diamond_block"),
        58 => block("crafting_table"),
        59 => block("wheat").with_property("age", (data & 0x7).to_string()),
        60 => block("farmland").with_property("moisture", (data & 0x7).to_string()),
        61 => horizontal("furnace", data).with_property("lit", "false"),
        62 => horizontal("furnace", data).with_property("lit", "true"),
        63 => block("oak_sign").with_property("rotation", data.to_string()),
        64 => door("oak", data),
        65 => horizontal("ladder", data),
        66 => block("rail").with_property("shape", RAIL_SHAPES.get(data).copied().unwrap_or("north_south")),
        67 => stairs("cobblestone", data),
        68 => horizontal("oak_wall_sign", data),
        69 => block("lever").with_property("powered", bool_str(data & 0x8 != 0)),
        70 => block("stone_pressure_plate").with_property("powered", bool_str(data & 0x1 != 0)),
        71 => door("iron", data),
        72 => block("oak_pressure_plate").with_property("powered", bool_str(data & 0x1 != 0)),
        73 => block("redstone_ore").with_property("lit", "false"),
        74 => block("redstone_ore").with_property("lit", "true"),
        75 => torch("redstone_torch", "redstone_wall_torch", data, Some(false)),
        76 => torch("redstone_torch", "redstone_wall_torch", data, Some(true)),
        77 => button("stone_button", data),
        78 => block("snow").with_property("layers", ((data & 0x7) + 1).to_string()),
        79 => block("ice"),
        80 => block("snow_block"),
        81 => block("cactus").with_property("age", data.to_string()),
        82 => block("clay"),
        83 => block("sugar_cane").with_property("age", data.to_string()),
        84 => block("jukebox").with_property("has_record", bool_str(data == 1)),
        85 => block("oak_fence"),
        86 => block("carved_pumpkin").with_property("facing", SWNE[data & 0x3]),
        87 => block("netherrack"),
        88 => block("soul_sand"),
        89 => block("glowstone"),
        90 => block("nether_portal").with_property("axis", if data == 2 { "z" } else { "x" }),
        91 => block("jack_o_lantern").with_property("facing", SWNE[data & 0x3]),
        92 => block("cake").with_property("bites", data.min(6).to_string()),
        93 | 94 => block("repeater")
            .with_property("facing", NESW[data & 0x3])
            .with_property("delay", ((data >> 2) + 1).to_string())
            .with_property("powered", bool_str(id == 94)),
        95 => colored("stained_glass", data),
        96 => trapdoor("oak", data),
        97 => block(INFESTED.get(data).copied().unwrap_or("infested_stone")),
        98 => block(match data {
            1 => "mossy_stone_bricks",
            2 => "cracked_stone_bricks",
            3 => "chiseled_stone_bricks",
            _ => "stone_bricks",
        }),
        99 => block(if data == 10 { "mushroom_stem" } else { "brown_mushroom_block" }),
        100 => block(if data == 10 { "mushroom_stem" } else { "red_mushroom_block" }),
        101 => block("iron_bars"),
        102 => block("glass_pane"),
        103 => block("melon"),
        104 => block("pumpkin_stem").with_property("age", (data & 0x7).to_string()),
        105 => block("melon_stem").with_property("age", (data & 0x7).to_string()),
        106 => block("vine"),
        107 => fence_gate("oak", data),
        108 => stairs("brick", data),
        109 => stairs("stone_brick", data),
        110 => block("mycelium"),
        111 => block("lily_pad"),
        112 => block("nether_bricks"),
        113 => block("nether_brick_fence"),
        114 => stairs("nether_brick", data),
        115 => block("nether_wart").with_property("age", (data & 0x3).to_string()),
        116 => block("enchanting_table"),
        117 => block("brewing_stand"),
        118 => block("cauldron"),
        119 => block("end_portal"),
        120 => block("end_portal_frame")
            .with_property("facing", SWNE[data & 0x3])
            .with_property("eye", bool_str(data & 0x4 != 0)),
        121 => block("end_stone"),
        122 => block("dragon_egg"),
        123 => block("redstone_lamp").with_property("lit", "false"),
        124 => block("redstone_lamp").with_property("lit", "true"),
        125 => slab(WOODS.get(data & 0x7).copied().unwrap_or("oak"), data, true),
        126 => slab(WOODS.get(data & 0x7).copied().unwrap_or("oak"), data, false),
        127 => block("cocoa")
            .with_property("facing", NESW[data & 0x3])
            .with_property("age", (data >> 2).min(2).to_string()),
        128 => stairs("sandstone", data),
        129 => block("emerald_ore"),
        130 => horizontal("ender_chest", data),
        131 => block("tripwire_hook").with_property("facing", SWNE[data & 0x3]),
        132 => block("tripwire"),
        133 => block("emerald_block"),
        134 => stairs("spruce", data),
        135 => stairs("birch", data),
        136 => stairs("jungle", data),
        137 => facing_6("command_block", data),
        138 => block("beacon"),
        139 => block(if data == 1 { "mossy_cobblestone_wall" } else { "cobblestone_wall" }),
        140 => block("flower_pot"),
        141 => block("carrots").with_property("age", (data & 0x7).to_string()),
        142 => block("potatoes").with_property("age", (data & 0x7).to_string()),
        143 => button("oak_button", data),
        144 => block("skeleton_skull"),
        145 => block(match data >> 2 {
            1 => "chipped_anvil",
            2 => "damaged_anvil",
            _ => "anvil",
        })
        .with_property("facing", SWNE[data & 0x3]),
        146 => horizontal("trapped_chest", data),
        147 => block("light_weighted_pressure_plate").with_property("power", data.to_string()),
        148 => block("heavy_weighted_pressure_plate").with_property("power", data.to_string()),
        149 | 150 => block("comparator")
            .with_property("facing", NESW[data & 0x3])
            .with_property("mode", if data & 0x4 != 0 { "subtract" } else { "compare" })
            .with_property("powered", bool_str(data & 0x8 != 0)),
        151 => block("daylight_detector").with_property("inverted", "false"),
        152 => block("redstone_block"),
        153 => block("nether_quartz_ore"),
        154 => facing_6("hopper", data).with_property("enabled", bool_str(data & 0x8 == 0)),
        155 => match data {
            1 => block("chiseled_quartz_block"),
            2 => block("quartz_pillar").with_property("axis", "y"),
            3 => block("quartz_pillar").with_property("axis", "x"),
            4 => block("quartz_pillar").with_property("axis", "z"),
            _ => block("quartz_block"),
        },
        156 => stairs("quartz", data),
        157 => powered_rail("activator_rail", data),
        158 => facing_6("dropper", data).with_property("triggered", bool_str(data & 0x8 != 0)),
        159 => colored("terracotta", data),
        160 => colored("stained_glass_pane", data),
        161 => leaves(WOODS[4 + (data & 0x1)], data),
        162 => log(WOODS[4 + (data & 0x1)], data),
        163 => stairs("acacia", data),
        164 => stairs("dark_oak", data),
        165 => block("slime_block"),
        166 => block("barrier"),
        167 => trapdoor("iron", data),
        168 => block(match data {
            1 => "prismarine_bricks",
            2 => "dark_prismarine",
            _ => "prismarine",
        }),
        169 => block("sea_lantern"),
        170 => block("hay_block").with_property(
            "axis",
            match data >> 2 {
                1 => "x",
                2 => "z",
                _ => "y",
            },
        ),
        171 => colored("carpet", data),
        172 => block("terracotta"),
        173 => block("coal_block"),
        174 => block("packed_ice"),
        175 => block(TALL_PLANTS.get(data & 0x7).copied().unwrap_or("sunflower"))
            .with_property("half", if data & 0x8 != 0 { "upper" } else { "lower" }),
        176 => block("white_banner").with_property("rotation", data.to_string()),
        177 => horizontal("white_wall_banner", data),
        178 => block("daylight_detector").with_property("inverted", "true"),
        179 => block(match data {
            1 => "chiseled_red_sandstone",
            2 => "cut_red_sandstone",
            _ => "red_sandstone",
        }),
        180 => stairs("red_sandstone", data),
        181 => slab("red_sandstone", data, true),
        182 => slab("red_sandstone", data, false),
        183 => fence_gate("spruce", data),
        184 => fence_gate("birch", data),
        185 => fence_gate("jungle", data),
        186 => fence_gate("dark_oak", data),
        187 => fence_gate("acacia", data),
        188 => block("spruce_fence"),
        189 => block("birch_fence"),
        190 => block("jungle_fence"),
        191 => block("dark_oak_fence"),
        192 => block("acacia_fence"),
        193 => door("spruce", data),
        194 => door("birch", data),
        195 => door("jungle", data),
        196 => door("acacia", data),
        197 => door("dark_oak", data),
        198 => facing_6("end_rod", data),
        199 => block("chorus_plant"),
        200 => block("chorus_flower").with_property("age", data.min(5).to_string()),
        201 => block("purpur_block"),
        202 => block("purpur_pillar").with_property(
            "axis",
            match data >> 2 {
                1 => "x",
                2 => "z",
                _ => "y",
            },
        ),
        203 => stairs("purpur", data),
        204 => slab("purpur", data, true),
        205 => slab("purpur", data, false),
        206 => block("end_stone_bricks"),
        207 => block("beetroots").with_property("age", (data & 0x3).to_string()),
        208 => block("dirt_path"),
        209 => block("end_gateway"),
        210 => facing_6("repeating_command_block", data),
        211 => facing_6("chain_command_block", data),
        212 => block("frosted_ice").with_property("age", (data & 0x3).to_string()),
        213 => block("magma_block"),
        214 => block("nether_wart_block"),
        215 => block("red_nether_bricks"),
        216 => block("bone_block").with_property(
            "axis",
            match data >> 2 {
                1 => "x",
                2 => "z",
                _ => "y",
            },
        ),
        217 => block("structure_void"),
        218 => facing_6("observer", data).with_property("powered", bool_str(data & 0x8 != 0)),
        219..=234 => facing_6(&format!("{}_shulker_box", COLORS[(id - 219) as usize]), data),
        235..=250 => block(&format!("{}_glazed_terracotta", COLORS[(id - 235) as usize]))
            .with_property("facing", SWNE[data & 0x3]),
        251 => colored("concrete", data),
        252 => colored("concrete_powder", data),
        255 => block("structure_block"),
        _ => return None,
    };
    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: u16, data: u8) -> Option<String> {
        legacy_block(id, data).map(|b| b.state_string())
    }

    #[test]
    fn test_variants_by_data_value() {
        assert_eq!(state(0, 0).as_deref(), Some("minecraft:air"));
        assert_eq!(state(1, 3).as_deref(), Some("minecraft:diorite"));
        assert_eq!(state(5, 2).as_deref(), Some("minecraft:birch_planks"));
        assert_eq!(state(35, 14).as_deref(), Some("minecraft:red_wool"));
        assert_eq!(state(251, 11).as_deref(), Some("minecraft:blue_concrete"));
        assert_eq!(state(38, 8).as_deref(), Some("minecraft:oxeye_daisy"));
    }

    #[test]
    fn test_slabs() {
        assert_eq!(state(44, 3).as_deref(), Some("minecraft:cobblestone_slab[type=bottom]"));
        assert_eq!(state(44, 13).as_deref(), Some("minecraft:stone_brick_slab[type=top]"));
        assert_eq!(state(43, 7).as_deref(), Some("minecraft:quartz_slab[type=double]"));
        assert_eq!(state(126, 9).as_deref(), Some("minecraft:spruce_slab[type=top]"));
        assert_eq!(state(182, 0).as_deref(), Some("minecraft:red_sandstone_slab[type=bottom]"));
    }

    #[test]
    fn test_stained_glass() {
        assert_eq!(state(95, 0).as_deref(), Some("minecraft:white_stained_glass"));
        assert_eq!(state(95, 15).as_deref(), Some("minecraft:black_stained_glass"));
        assert_eq!(state(160, 3).as_deref(), Some("minecraft:light_blue_stained_glass_pane"));
    }

    #[test]
    fn test_stairs_carry_facing_and_half() {
        assert_eq!(
            state(134, 6).as_deref(),
            Some("minecraft:spruce_stairs[facing=south,half=top,shape=straight]")
        );
        assert_eq!(
            state(53, 0).as_deref(),
            Some("minecraft:oak_stairs[facing=east,half=bottom,shape=straight]")
        );
    }

    #[test]
    fn test_door_halves() {
        assert_eq!(
            state(64, 5).as_deref(),
            Some("minecraft:oak_door[facing=south,half=lower,open=true]")
        );
        assert_eq!(state(197, 9).as_deref(), Some("minecraft:dark_oak_door[half=upper,hinge=right]"));
    }

    #[test]
    fn test_facing_blocks() {
        assert_eq!(state(68, 5).as_deref(), Some("minecraft:oak_wall_sign[facing=east]"));
        assert_eq!(state(63, 12).as_deref(), Some("minecraft:oak_sign[rotation=12]"));
        assert_eq!(state(50, 3).as_deref(), Some("minecraft:wall_torch[facing=south]"));
        assert_eq!(state(50, 5).as_deref(), Some("minecraft:torch"));
        assert_eq!(
            state(26, 10).as_deref(),
            Some("minecraft:red_bed[facing=north,occupied=false,part=head]")
        );
        assert_eq!(
            state(96, 12).as_deref(),
            Some("minecraft:oak_trapdoor[facing=north,half=top,open=true]")
        );
        assert_eq!(state(66, 7).as_deref(), Some("minecraft:rail[shape=south_west]"));
    }

    #[test]
    fn test_log_axis() {
        assert_eq!(state(17, 0b0110).as_deref(), Some("minecraft:birch_log[axis=x]"));
        assert_eq!(state(162, 0b1101).as_deref(), Some("minecraft:dark_oak_wood[axis=y]"));
    }

    #[test]
    fn test_wood_families() {
        assert_eq!(state(188, 0).as_deref(), Some("minecraft:spruce_fence"));
        assert_eq!(state(187, 4).as_deref(), Some("minecraft:acacia_fence_gate[facing=south,open=true]"));
        assert_eq!(state(164, 1).as_deref(), Some("minecraft:dark_oak_stairs[facing=west,half=bottom,shape=straight]"));
    }

    #[test]
    fn test_unknown_id_is_no_block() {
        assert_eq!(state(253, 0), None);
        assert_eq!(state(4000, 0), None);
    }
}
