mod neighbors_properties;
