//! Built-in word deck used when the host application supplies none (or not
//! enough). Plain, well-known nouns work best: every word needs several
//! plausible associations for clues to be interesting.

/// Smallest deck a game will run with; shorter custom decks are padded
/// from [`DEFAULT_DECK`].
pub(crate) const MIN_DECK_SIZE: usize = 200;

pub(crate) const DEFAULT_DECK: &[&str] = &[
    "anchor", "apple", "arrow", "badge", "balloon", "banana", "band", "bank", "barrel", "basin",
    "basket", "beach", "bear", "bell", "belt", "bench", "berry", "blade", "blanket", "board",
    "boat", "bolt", "bone", "book", "boot", "bottle", "bow", "box", "branch", "brick",
    "bridge", "brush", "bucket", "button", "cabin", "cable", "cactus", "cake", "camera", "camp",
    "candle", "cannon", "canoe", "cape", "card", "carpet", "carrot", "castle", "cave", "chain",
    "chair", "chalk", "charge", "chest", "chicken", "chief", "church", "circle", "claw", "cliff",
    "cloak", "clock", "cloud", "clown", "club", "coach", "coast", "coat", "coin", "comb",
    "comet", "compass", "cook", "copper", "cord", "cork", "corn", "court", "crane", "crown",
    "crystal", "cup", "current", "curtain", "cycle", "dance", "deck", "desert", "desk", "diamond",
    "dice", "dish", "doctor", "dog", "door", "dragon", "dream", "dress", "drill", "drum",
    "duck", "eagle", "earth", "engine", "fair", "fall", "fan", "farm", "feather", "fence",
    "field", "figure", "film", "fire", "fish", "flag", "flood", "floor", "flute", "fog",
    "forest", "fork", "fort", "frame", "frog", "frost", "garden", "gate", "ghost", "giant",
    "glass", "glove", "gold", "grass", "guard", "guitar", "hammer", "harbor", "hat", "hawk",
    "heart", "hedge", "helmet", "hill", "hook", "horn", "horse", "hotel", "house", "ice",
    "iron", "island", "ivory", "jacket", "jewel", "judge", "kettle", "key", "king", "kite",
    "knife", "knight", "ladder", "lake", "lamp", "lantern", "leaf", "lemon", "letter", "light",
    "lion", "lock", "log", "luck", "machine", "magnet", "mammoth", "map", "marble", "mark",
    "market", "mask", "match", "maze", "meadow", "medal", "mill", "mine", "mirror", "monk",
    "moon", "moss", "motor", "mountain", "mouse", "mouth", "nail", "needle", "nest", "net",
    "night", "note", "oak", "oar", "ocean", "office", "olive", "onion", "opera", "orange",
    "organ", "owl", "palace", "palm", "paper", "parade", "park", "pearl", "pen", "piano",
    "pilot", "pipe", "pirate", "plane", "plate", "pool", "port", "post", "pump", "pyramid",
    "queen", "rail", "rain", "rainbow", "ranch", "ring", "river", "robot", "rock", "root",
    "rope", "rose", "ruler", "saddle", "sail", "salt", "sand", "scale", "school", "scissors",
    "screen", "seal", "shadow", "shark", "shell", "shield", "ship", "shoe", "shop", "silver",
    "spider", "spring", "square", "stable", "star", "station", "steam", "stick", "stone", "storm",
    "stream", "string", "sun", "sword", "table", "tail", "tea", "temple", "tent", "theater",
    "thread", "throne", "thumb", "ticket", "tiger", "torch", "tower", "train", "trap", "tree",
    "trunk", "tunnel", "turtle", "umbrella", "valley", "vault", "village", "violin", "wagon",
    "wall", "watch", "water", "wave", "well", "whale", "wheel", "whip", "whistle", "window",
    "wing", "wire", "witch", "wolf", "wood", "wool", "yard",
];
